mod dtd;
mod state;
mod transducer;
mod tsv_handler;
mod xml_driver;

// Re-export public API
pub use dtd::EntityTable;
pub use state::{ElementKind, ParseState};
pub use transducer::{transduce, Transducer};
pub use tsv_handler::{EventHandler, TsvHandler};
pub use xml_driver::{drive, xml_reader};
