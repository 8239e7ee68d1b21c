//! rmx-tsv library
//!
//! This crate provides the core functionality for the `rmx-tsv` binary.
//! The crate root only declares modules; implementation and tests live in them.
//!
//! ## Overview
//!
//! A report export is an XML document holding one `HEADER` element and any
//! number of `ROW` elements, each with `COLUMN` children. The converter streams
//! it once and writes one tab-terminated line per `HEADER`/`ROW`:
//!
//! - [`parser`] - Streaming HEADER/ROW/COLUMN converter built on `quick-xml`
//! - [`cli`] - Command-line surface and exit status policy
//! - [`config`] - Report dialect and output layout settings
//! - [`models`] - Run summary counters
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```
//! use rmx_tsv::{config::ResolvedConfig, parser};
//!
//! let xml = "<REPORT><HEADER><COLUMN>Name</COLUMN></HEADER>\
//!            <ROW><COLUMN>Ann</COLUMN></ROW></REPORT>";
//! let mut out = Vec::new();
//! parser::transduce(xml.as_bytes(), &mut out, &ResolvedConfig::default()).unwrap();
//! assert_eq!(out, b"Name\t\nAnn\t\n");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod parser;
