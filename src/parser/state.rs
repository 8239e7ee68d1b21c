use crate::config::ResolvedConfig;

/// Report elements the converter reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Header,
    Row,
    Column,
}

impl ElementKind {
    /// Maps a qualified element name to its kind, or `None` if the element is ignored.
    pub fn classify(name: &[u8], config: &ResolvedConfig) -> Option<Self> {
        if name == config.header_element.as_bytes() {
            Some(Self::Header)
        } else if name == config.row_element.as_bytes() {
            Some(Self::Row)
        } else if name == config.column_element.as_bytes() {
            Some(Self::Column)
        } else {
            None
        }
    }
}

/// Position of the parser relative to HEADER, ROW and COLUMN elements.
///
/// Each flag is a two-state machine (outside/inside). The flags do not count
/// depth: a nested element of the same kind re-asserts "inside" and its close
/// clears the flag for the outer one too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseState {
    pub in_header: bool,
    pub in_row: bool,
    pub in_column: bool,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, kind: ElementKind) {
        self.set(kind, true);
    }

    pub fn leave(&mut self, kind: ElementKind) {
        self.set(kind, false);
    }

    /// Character data is written only inside a COLUMN that sits in a HEADER or ROW.
    pub fn is_emitting(&self) -> bool {
        self.in_column && (self.in_header || self.in_row)
    }

    fn set(&mut self, kind: ElementKind, inside: bool) {
        match kind {
            ElementKind::Header => self.in_header = inside,
            ElementKind::Row => self.in_row = inside,
            ElementKind::Column => self.in_column = inside,
        }
    }
}
