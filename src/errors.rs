use crate::marker::Marker;
use std::{fmt, io};

/// A Civ save Error
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct CivError(#[from] Box<CivErrorKind>);

impl CivError {
    pub(crate) fn new(kind: CivErrorKind) -> CivError {
        CivError(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &CivErrorKind {
        &self.0
    }

    /// Consume self and return the specific type of error
    pub fn into_kind(self) -> CivErrorKind {
        *self.0
    }

    pub(crate) fn truncated(offset: usize, needed: usize, len: usize) -> CivError {
        CivError::new(CivErrorKind::Truncated {
            offset,
            needed,
            len,
        })
    }

    pub(crate) fn missing(field: &'static str) -> CivError {
        CivError::new(CivErrorKind::MissingField { field })
    }
}

impl From<CivErrorKind> for CivError {
    fn from(err: CivErrorKind) -> Self {
        CivError::new(err)
    }
}

/// The leading bytes of a file that failed format detection
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Magic(pub [u8; 4]);

impl fmt::Debug for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.iter() {
            if b.is_ascii_graphic() {
                write!(f, "{}", *b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

/// Specific type of error
#[derive(thiserror::Error, Debug)]
pub enum CivErrorKind {
    #[error("unrecognized save file format. starts with {magic}")]
    UnrecognizedFormat { magic: Magic },

    #[error("early eof at offset {offset}: needed {needed} bytes but buffer is {len} bytes")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("unrecognized chunk type {chunk_type:#x} at offset {offset}")]
    UnrecognizedChunkType { offset: usize, chunk_type: u32 },

    #[error("unrecognized string descriptor {flag:#x} at offset {offset}")]
    InvalidString { offset: usize, flag: u8 },

    #[error("expected record array entry at offset {offset}")]
    InvalidRecordArray { offset: usize },

    #[error("gave up resynchronizing after {attempts} attempts at offset {offset}")]
    ResyncExhausted { offset: usize, attempts: usize },

    #[error("chunks nested too deeply at offset {offset}")]
    DepthExceeded { offset: usize },

    #[error("save is missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("unexpected {found:?} value for {marker}")]
    UnexpectedValue {
        marker: Marker,
        found: &'static str,
    },

    #[error("team id {team} for {marker} is out of range")]
    InvalidTeam { marker: Marker, team: u32 },

    #[error("unable to parse map localization: {0}")]
    MapLocalization(#[source] serde_path_to_error::Error<serde_json::Error>),

    #[error("unable to inflate compressed section: {msg}")]
    Inflate { msg: String },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<io::Error> for CivError {
    fn from(value: io::Error) -> Self {
        CivError::from(CivErrorKind::from(value))
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for CivError {
    fn from(value: serde_path_to_error::Error<serde_json::Error>) -> Self {
        CivError::from(CivErrorKind::MapLocalization(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_of_error_test() {
        assert_eq!(std::mem::size_of::<CivError>(), 8);
    }

    #[test]
    fn magic_display_escapes_binary() {
        let magic = Magic([b'P', b'K', 0x03, 0x04]);
        assert_eq!(magic.to_string(), "PK\\x03\\x04");
    }

    #[test]
    fn truncated_message() {
        let err = CivError::truncated(10, 4, 12);
        assert!(matches!(
            err.kind(),
            CivErrorKind::Truncated {
                offset: 10,
                needed: 4,
                len: 12
            }
        ));
        assert_eq!(
            err.to_string(),
            "early eof at offset 10: needed 4 bytes but buffer is 12 bytes"
        );
    }
}
