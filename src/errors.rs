use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by a conversion run.
#[derive(Debug, Error)]
pub enum AppError {
    /// The input file could not be opened
    #[error("Can't open XML file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading the input failed after it was opened
    #[error("Failed to read XML file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },
    /// The input is not well-formed XML
    #[error("Malformed XML in {} at byte {position}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        position: u64,
        #[source]
        source: MalformedXml,
    },
    /// Writing converted output failed
    #[error("Failed to write output: {0}")]
    Write(#[source] io::Error),
    /// Invalid argument or configuration value
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Reasons an input document is rejected.
#[derive(Debug, Error)]
pub enum MalformedXml {
    #[error(transparent)]
    Syntax(#[from] quick_xml::Error),
    #[error("no element found")]
    NoRootElement,
    #[error("unexpected end of input, {0} element(s) left unclosed")]
    UnclosedElements(usize),
    #[error("junk after document element")]
    ContentAfterRoot,
    #[error("text outside of the document element")]
    ContentOutsideRoot,
    #[error("undefined entity &{0};")]
    UndefinedEntity(String),
    #[error("recursive entity reference &{0};")]
    RecursiveEntity(String),
    #[error("invalid entity declaration: {0}")]
    InvalidEntityDeclaration(String),
}

/// Failure of a path-less conversion stream.
///
/// Attach the input path with [`StreamError::at`] to obtain an [`AppError`].
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("read failed: {0}")]
    Read(Arc<io::Error>),
    #[error("malformed XML at byte {position}: {source}")]
    Malformed {
        position: u64,
        #[source]
        source: MalformedXml,
    },
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

impl StreamError {
    pub fn malformed(position: u64, source: impl Into<MalformedXml>) -> Self {
        StreamError::Malformed {
            position,
            source: source.into(),
        }
    }

    pub fn at(self, path: &Path) -> AppError {
        match self {
            StreamError::Read(source) => AppError::Read {
                path: path.to_path_buf(),
                source,
            },
            StreamError::Malformed { position, source } => AppError::Malformed {
                path: path.to_path_buf(),
                position,
                source,
            },
            StreamError::Write(e) => AppError::Write(e),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_open_error_names_the_file() {
        let err = AppError::Open {
            path: PathBuf::from("reports/missing.xml"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Can't open XML file"));
        assert!(msg.contains("reports/missing.xml"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_stream_error_at_attaches_path() {
        let err =
            StreamError::malformed(42, MalformedXml::UnclosedElements(2)).at(Path::new("r.xml"));
        match &err {
            AppError::Malformed { path, position, .. } => {
                assert_eq!(path, Path::new("r.xml"));
                assert_eq!(*position, 42);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("r.xml"));
        assert!(msg.contains("byte 42"));
        assert!(err.source().unwrap().to_string().contains("2 element(s)"));
    }

    #[test]
    fn test_write_error_keeps_no_path() {
        let err = StreamError::Write(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
            .at(Path::new("r.xml"));
        assert!(matches!(err, AppError::Write(_)));
        assert!(err.to_string().contains("Failed to write output"));
    }

    #[test]
    fn test_undefined_entity_display() {
        let err = MalformedXml::UndefinedEntity("nbsp".to_string());
        assert_eq!(err.to_string(), "undefined entity &nbsp;");
    }

    #[test]
    fn test_app_error_implements_error_trait() {
        let err: Box<dyn Error> = Box::new(AppError::InvalidInput("empty path".to_string()));
        assert!(!err.to_string().is_empty());
    }
}
