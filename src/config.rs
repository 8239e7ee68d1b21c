use crate::constants::{
    DEFAULT_COLUMN_ELEMENT, DEFAULT_FIELD_TERMINATOR, DEFAULT_HEADER_ELEMENT,
    DEFAULT_READ_BUFFER_CAPACITY, DEFAULT_RECORD_TERMINATOR, DEFAULT_ROW_ELEMENT,
};
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// How character data inside a COLUMN turns into output fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FragmentMode {
    /// Every fragment the parser delivers becomes its own terminated field.
    #[default]
    Split,
    /// Fragments are joined and written as one field when the COLUMN closes.
    Coalesce,
}

/// Resolved conversion settings with all values filled in (no Options).
///
/// The command-line tool always runs with [`ResolvedConfig::default`]; the TOML
/// loaders are for library callers converting report dialects with other tag names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// Element whose COLUMN children form the label line
    pub header_element: String,
    /// Element whose COLUMN children form one data line
    pub row_element: String,
    /// Leaf element carrying one field's text
    pub column_element: String,
    /// Written after every field, including the last one of a line
    pub field_terminator: String,
    /// Written when a HEADER or ROW closes
    pub record_terminator: String,
    pub fragment_mode: FragmentMode,
    /// Initial capacity of the reusable XML event buffer.
    pub read_buffer_capacity: usize,
    /// Process exit status after a failed conversion.
    /// Defaults to 0, matching the historical behavior of the tool.
    pub failure_exit_code: i32,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            header_element: DEFAULT_HEADER_ELEMENT.to_string(),
            row_element: DEFAULT_ROW_ELEMENT.to_string(),
            column_element: DEFAULT_COLUMN_ELEMENT.to_string(),
            field_terminator: DEFAULT_FIELD_TERMINATOR.to_string(),
            record_terminator: DEFAULT_RECORD_TERMINATOR.to_string(),
            fragment_mode: FragmentMode::Split,
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
            failure_exit_code: 0,
        }
    }
}

impl ResolvedConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// Missing keys take their defaults; unknown keys are rejected so typos are
    /// not silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the TOML is malformed, has unknown keys, or fails
    /// [`ResolvedConfig::validate`].
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let config: ResolvedConfig = toml::from_str(contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::InvalidInput(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks that element names are non-empty and distinct and the buffer is usable.
    pub fn validate(&self) -> AppResult<()> {
        let names = [
            ("header_element", &self.header_element),
            ("row_element", &self.row_element),
            ("column_element", &self.column_element),
        ];
        for (key, name) in names {
            if name.is_empty() {
                return Err(AppError::InvalidInput(format!("{key} must not be empty")));
            }
        }
        if self.header_element == self.row_element
            || self.header_element == self.column_element
            || self.row_element == self.column_element
        {
            return Err(AppError::InvalidInput(
                "header_element, row_element and column_element must differ".into(),
            ));
        }
        if self.read_buffer_capacity == 0 {
            return Err(AppError::InvalidInput(
                "Read buffer capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
