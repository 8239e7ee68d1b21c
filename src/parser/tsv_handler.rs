use super::state::{ElementKind, ParseState};
use crate::config::{FragmentMode, ResolvedConfig};
use crate::models::RunSummary;
use std::io::{self, Write};
use tracing::trace;

/// Receives parse events in document order.
///
/// Names are qualified element names exactly as written in the input. The only
/// failure a handler reports is an output write error.
pub trait EventHandler {
    fn start_element(&mut self, name: &[u8]) -> io::Result<()>;
    fn characters(&mut self, text: &str) -> io::Result<()>;
    fn end_element(&mut self, name: &[u8]) -> io::Result<()>;
}

/// Writes COLUMN text of HEADER and ROW elements as terminated fields, one line per element.
pub struct TsvHandler<'c, W: Write> {
    out: W,
    config: &'c ResolvedConfig,
    state: ParseState,
    /// Column text collected in [`FragmentMode::Coalesce`]
    pending: String,
    summary: RunSummary,
}

impl<'c, W: Write> TsvHandler<'c, W> {
    pub fn new(out: W, config: &'c ResolvedConfig) -> Self {
        Self {
            out,
            config,
            state: ParseState::new(),
            pending: String::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_field(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(self.config.field_terminator.as_bytes())?;
        self.summary.record_field();
        Ok(())
    }

    fn end_record(&mut self) -> io::Result<()> {
        self.out.write_all(self.config.record_terminator.as_bytes())?;
        self.summary.record_line();
        trace!(records = self.summary.records, "Record written");
        Ok(())
    }
}

impl<W: Write> EventHandler for TsvHandler<'_, W> {
    fn start_element(&mut self, name: &[u8]) -> io::Result<()> {
        if let Some(kind) = ElementKind::classify(name, self.config) {
            if kind == ElementKind::Column {
                self.pending.clear();
            }
            self.state.enter(kind);
        }
        Ok(())
    }

    fn characters(&mut self, text: &str) -> io::Result<()> {
        if !self.state.is_emitting() {
            return Ok(());
        }
        match self.config.fragment_mode {
            FragmentMode::Split => self.write_field(text),
            FragmentMode::Coalesce => {
                self.pending.push_str(text);
                Ok(())
            }
        }
    }

    fn end_element(&mut self, name: &[u8]) -> io::Result<()> {
        let Some(kind) = ElementKind::classify(name, self.config) else {
            return Ok(());
        };
        match kind {
            ElementKind::Header | ElementKind::Row => {
                self.state.leave(kind);
                self.end_record()
            }
            ElementKind::Column => {
                let coalescing = self.config.fragment_mode == FragmentMode::Coalesce;
                if coalescing && self.state.is_emitting() {
                    let text = std::mem::take(&mut self.pending);
                    self.write_field(&text)?;
                }
                self.state.leave(kind);
                Ok(())
            }
        }
    }
}
