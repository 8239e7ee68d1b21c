/// Counts of what a conversion run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines written, one per closed HEADER or ROW element.
    pub records: u64,
    /// Terminated fields written across all lines.
    pub fields: u64,
}

impl RunSummary {
    pub fn record_field(&mut self) {
        self.fields += 1;
    }

    pub fn record_line(&mut self) {
        self.records += 1;
    }
}
