use std::io;

use thiserror::Error;

pub type PersistResult<T> = Result<T, PersistError>;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("record artifact i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("malformed record encoding: {0}")]
    Format(#[from] FormatError),
}

impl PersistError {
    pub fn is_io(&self) -> bool {
        matches!(self, PersistError::Io(_))
    }

    pub fn is_format(&self) -> bool {
        matches!(self, PersistError::Format(_))
    }

    pub fn format(&self) -> Option<&FormatError> {
        match self {
            PersistError::Format(err) => Some(err),
            PersistError::Io(_) => None,
        }
    }

    // A source that ends early holds an incomplete record, not a broken device.
    pub(crate) fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            PersistError::Format(FormatError::Truncated)
        } else {
            PersistError::Io(err)
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("bad magic {0:?}")]
    BadMagic([u8; 4]),

    #[error("unsupported stream version {0}")]
    UnsupportedStreamVersion(u8),

    #[error("expected a `{expected}` record, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("`{type_name}` version {found} does not match local version {expected}")]
    VersionMismatch {
        type_name: &'static str,
        expected: u16,
        found: u16,
    },

    #[error("field `{field}` has unknown type tag {tag}")]
    UnknownTag { field: String, tag: u8 },

    #[error("field `{0}` appears more than once")]
    DuplicateField(String),

    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("required field `{0}` is null")]
    UnexpectedNull(&'static str),

    #[error("text is not valid utf-8")]
    InvalidUtf8,

    #[error("length {len} exceeds limit {max}")]
    LengthOverflow { len: usize, max: usize },

    #[error("encoding ends before the record is complete")]
    Truncated,

    #[error("{0} unexpected bytes after the record")]
    TrailingBytes(usize),
}

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("failed to spawn task: {0}")]
    Spawn(#[from] io::Error),

    #[error("{0} task panicked")]
    TaskPanicked(&'static str),
}
