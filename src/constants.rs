// Report dialect
pub const DEFAULT_HEADER_ELEMENT: &str = "HEADER";
pub const DEFAULT_ROW_ELEMENT: &str = "ROW";
pub const DEFAULT_COLUMN_ELEMENT: &str = "COLUMN";

// Output layout
pub const DEFAULT_FIELD_TERMINATOR: &str = "\t";
pub const DEFAULT_RECORD_TERMINATOR: &str = "\n";

pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 8192;

// Exit statuses
pub const USAGE_EXIT_CODE: i32 = 255;
pub const USAGE_MESSAGE: &str = "Expecting name of file";

// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";
