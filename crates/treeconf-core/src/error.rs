//! Error types for treeconf
//!
//! Errors are structured: a kind, the dotted key involved (if any),
//! the underlying cause and an actionable help message.

use std::fmt;

/// Result type alias for treeconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for treeconf operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Dotted key the error relates to (e.g., "database.port")
    pub path: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The YAML input could not be parsed into a configuration
    Parse,
    /// The configuration could not be serialized or written out
    Write,
    /// A stored value could not be converted to the requested type
    TypeCoercion {
        /// Canonical text of the offending value
        value: String,
        /// Name of the requested type
        expected: String,
    },
    /// A required key is not present
    PathNotFound,
    /// Reading input failed
    Io,
    /// A mutation would leave the store without a tree shape
    InvalidStructure,
}

impl Error {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: None,
            help: None,
            cause: None,
        }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            cause: Some(message.into()),
            ..Self::new(ErrorKind::Parse)
        }
    }

    /// Create a new write error
    pub fn write(message: impl Into<String>) -> Self {
        Self {
            cause: Some(message.into()),
            ..Self::new(ErrorKind::Write)
        }
    }

    /// Create an I/O error for an input source
    pub fn io(source: impl Into<String>, message: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            help: Some(format!("Check that '{}' exists and is readable", source)),
            cause: Some(message.into()),
            ..Self::new(ErrorKind::Io)
        }
    }

    /// Create a path not found error
    pub fn path_not_found(path: impl Into<String>) -> Self {
        let path_str = path.into();
        Self {
            help: Some(format!(
                "Check that '{}' exists in the configuration",
                path_str
            )),
            path: Some(path_str),
            ..Self::new(ErrorKind::PathNotFound)
        }
    }

    /// Create a type coercion error
    pub fn type_coercion(
        path: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        let expected = expected.into();
        Self {
            help: Some(format!("Ensure the value can be converted to {}", expected)),
            path: Some(path.into()),
            ..Self::new(ErrorKind::TypeCoercion {
                value: value.into(),
                expected,
            })
        }
    }

    /// Create an invalid structure error
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self {
            cause: Some(message.into()),
            ..Self::new(ErrorKind::InvalidStructure)
        }
    }

    /// Add path context to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Whether this error is a type coercion failure
    pub fn is_type_coercion(&self) -> bool {
        matches!(self.kind, ErrorKind::TypeCoercion { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Parse => write!(f, "Parse error")?,
            ErrorKind::Write => write!(f, "Write error")?,
            ErrorKind::TypeCoercion { value, expected } => write!(
                f,
                "Type coercion failed: cannot convert '{}' to {}",
                value, expected
            )?,
            ErrorKind::PathNotFound => write!(f, "Path not found")?,
            ErrorKind::Io => write!(f, "I/O error")?,
            ErrorKind::InvalidStructure => write!(f, "Invalid structure")?,
        }

        if let Some(path) = &self.path {
            write!(f, "\n  Path: {}", path)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
