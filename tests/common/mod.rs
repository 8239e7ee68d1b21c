//! Common test utilities for integration tests

use std::fs;
use std::io::Write;
use std::path::Path;

/// Helper function to create a test XML file in a directory
#[allow(dead_code)]
pub fn create_test_xml_file(path: &Path, content: &[u8]) {
    let parent = path.parent().unwrap();
    fs::create_dir_all(parent).unwrap();
    fs::File::create(path).unwrap().write_all(content).unwrap();
}

/// Header with three columns followed by two rows, indented the way report exports are
#[allow(dead_code)]
pub const SAMPLE_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<REPORT>
  <HEADER>
    <COLUMN>Id</COLUMN>
    <COLUMN>Name</COLUMN>
    <COLUMN>City</COLUMN>
  </HEADER>
  <ROW>
    <COLUMN>1</COLUMN>
    <COLUMN>Ann</COLUMN>
    <COLUMN>Zürich</COLUMN>
  </ROW>
  <ROW>
    <COLUMN>2</COLUMN>
    <COLUMN>Bob</COLUMN>
    <COLUMN>Oslo</COLUMN>
  </ROW>
</REPORT>
"#;

#[allow(dead_code)]
pub const SAMPLE_REPORT_TSV: &str = "Id\tName\tCity\t\n1\tAnn\tZürich\t\n2\tBob\tOslo\t\n";

/// Report whose last ROW is never closed
#[allow(dead_code)]
pub const TRUNCATED_REPORT: &str = r#"<REPORT>
  <HEADER><COLUMN>Id</COLUMN></HEADER>
  <ROW><COLUMN>1</COLUMN></ROW>
  <ROW><COLUMN>2</COLUMN>
"#;

/// Report with no ROW elements
#[allow(dead_code)]
pub const HEADER_ONLY_REPORT: &str =
    "<REPORT><HEADER><COLUMN>A</COLUMN><COLUMN>B</COLUMN></HEADER></REPORT>";
