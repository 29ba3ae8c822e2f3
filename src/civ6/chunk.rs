use super::markers::{ActorField, COMPRESSED_DATA_END, ZLIB_HEADER};
use crate::{
    cursor::{ByteCursor, TextEncoding},
    marker::Marker,
    CivError, CivErrorKind,
};
use std::collections::HashMap;
use std::fmt;

/// Type code of a Civ VI chunk
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub u32);

impl ChunkType {
    pub const PADDING: ChunkType = ChunkType(0x00);
    pub const BOOL: ChunkType = ChunkType(0x01);
    pub const INT: ChunkType = ChunkType(0x02);
    pub const UNKNOWN_12: ChunkType = ChunkType(0x03);
    pub const STRING: ChunkType = ChunkType(0x04);
    pub const UTF16: ChunkType = ChunkType(0x05);
    pub const UTF16_ALT: ChunkType = ChunkType(0x06);
    pub const ARRAY: ChunkType = ChunkType(0x0A);
    pub const RECORDS: ChunkType = ChunkType(0x0B);
    pub const UNKNOWN_16: ChunkType = ChunkType(0x0D);
    pub const UNKNOWN_16_ALT: ChunkType = ChunkType(0x14);
    pub const UNKNOWN_VARIABLE: ChunkType = ChunkType(0x15);
    pub const COMPRESSED: ChunkType = ChunkType(0x18);
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({:#x})", self.0)
    }
}

/// A player record decoded from a record array, keyed by the actor fields
/// found within it
pub type Record = HashMap<ActorField, ChunkData>;

/// The decoded payload of a chunk
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkData {
    /// Padding without a structured payload
    Skip,

    /// A fixed size payload whose meaning is not known
    Unknown,

    /// The start of a compressed region that was stepped over
    UnknownCompressed,
    Bool(bool),
    Int(u32),
    Str(String),

    /// A narrow string variant whose layout has never been worked out.
    /// No known save carries meaningful data in it.
    UnresolvedString,
    Array(Vec<ChunkData>),
    Records(Vec<Record>),
}

impl ChunkData {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ChunkData::Bool(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<u32> {
        match self {
            ChunkData::Int(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ChunkData::Str(x) => Some(x.as_str()),
            _ => None,
        }
    }

    /// Short description of the variant for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            ChunkData::Skip => "skip",
            ChunkData::Unknown => "unknown",
            ChunkData::UnknownCompressed => "compressed",
            ChunkData::Bool(_) => "bool",
            ChunkData::Int(_) => "int",
            ChunkData::Str(_) => "string",
            ChunkData::UnresolvedString => "unresolved string",
            ChunkData::Array(_) => "array",
            ChunkData::Records(_) => "records",
        }
    }

    fn is_record_terminator(&self) -> bool {
        matches!(self, ChunkData::Str(x) if x == "1")
    }
}

/// A decoded Civ VI chunk
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Offset of the marker in the file
    pub offset: usize,

    /// Offset one past the last byte of the payload
    pub end: usize,
    pub marker: Marker,
    pub chunk_type: ChunkType,
    pub data: ChunkData,
}

impl Chunk {
    pub(crate) fn int(&self) -> Result<u32, CivError> {
        self.data.as_int().ok_or_else(|| self.unexpected())
    }

    pub(crate) fn bool(&self) -> Result<bool, CivError> {
        self.data.as_bool().ok_or_else(|| self.unexpected())
    }

    pub(crate) fn str(&self) -> Result<&str, CivError> {
        self.data.as_str().ok_or_else(|| self.unexpected())
    }

    fn unexpected(&self) -> CivError {
        CivError::from(CivErrorKind::UnexpectedValue {
            marker: self.marker,
            found: self.data.kind(),
        })
    }
}

/// Default cap on consecutive resynchronization attempts
pub const DEFAULT_MAX_RESYNCS: usize = 4096;

/// How far an unknown type code rewinds the cursor from the end of the
/// chunk header. Known saves depend on this exact distance.
const RESYNC_REWIND: usize = 7;

const MAX_DEPTH: usize = 16;

const UTF16_DESCRIPTOR: [u8; 6] = [0x00, 0x21, 0x02, 0x00, 0x00, 0x00];
const STRING_PLAIN: u8 = 0x21;
const UNKNOWN_VARIABLE_LONG: [u8; 4] = [0x00, 0x00, 0x00, 0x80];

/// Decodes one chunk at a time from a Civ VI save
#[derive(Debug, Clone)]
pub(crate) struct ChunkReader<'a> {
    pub(crate) cursor: ByteCursor<'a>,
    max_resyncs: usize,
}

impl<'a> ChunkReader<'a> {
    pub(crate) fn new(data: &'a [u8], max_resyncs: usize) -> Self {
        ChunkReader {
            cursor: ByteCursor::new(data),
            max_resyncs,
        }
    }

    /// Decode the chunk at the cursor.
    ///
    /// Inside arrays `dont_skip` is set so that entries with a small marker
    /// value are still decoded.
    pub(crate) fn next_chunk(&mut self, dont_skip: bool, depth: usize) -> Result<Chunk, CivError> {
        let mut attempts = 0;
        loop {
            let offset = self.cursor.position();
            let marker = self.cursor.read_marker()?;
            let chunk_type = ChunkType(self.cursor.read_u32_le()?);

            if let Some(data) = self.read_payload(marker, chunk_type, dont_skip, depth)? {
                let chunk = Chunk {
                    offset,
                    end: self.cursor.position(),
                    marker,
                    chunk_type,
                    data,
                };

                tracing::trace!(offset, %marker, chunk_type = chunk_type.0, kind = chunk.data.kind(), "decoded chunk");
                return Ok(chunk);
            }

            attempts += 1;
            if attempts > self.max_resyncs {
                return Err(CivError::from(CivErrorKind::ResyncExhausted {
                    offset,
                    attempts,
                }));
            }

            tracing::debug!(
                offset,
                chunk_type = chunk_type.0,
                "unrecognized chunk type, resynchronizing"
            );
            self.cursor.rewind(RESYNC_REWIND);
        }
    }

    /// Returns `None` when the type code is not recognized. The cursor is
    /// left directly after the chunk header in that case.
    fn read_payload(
        &mut self,
        marker: Marker,
        chunk_type: ChunkType,
        dont_skip: bool,
        depth: usize,
    ) -> Result<Option<ChunkData>, CivError> {
        if (!dont_skip && marker.value() < 256) || chunk_type == ChunkType::PADDING {
            return Ok(Some(ChunkData::Skip));
        }

        if chunk_type == ChunkType::COMPRESSED || self.cursor.starts_with(&ZLIB_HEADER) {
            self.skip_compressed()?;
            return Ok(Some(ChunkData::UnknownCompressed));
        }

        let data = match chunk_type {
            ChunkType::BOOL => {
                let result = self.cursor.bool_at(8)?;
                self.cursor.skip(12)?;
                ChunkData::Bool(result)
            }
            ChunkType::INT => {
                self.cursor.skip(8)?;
                ChunkData::Int(self.cursor.read_u32_le()?)
            }
            ChunkType::UNKNOWN_12 => {
                self.cursor.skip(12)?;
                ChunkData::Unknown
            }
            ChunkType::UNKNOWN_VARIABLE => {
                let len = if self.cursor.peek_bytes(4)? == UNKNOWN_VARIABLE_LONG {
                    20
                } else {
                    12
                };
                self.cursor.skip(len)?;
                ChunkData::Unknown
            }
            ChunkType::UNKNOWN_16 | ChunkType::UNKNOWN_16_ALT => {
                self.cursor.skip(16)?;
                ChunkData::Unknown
            }
            ChunkType::STRING => self.read_string()?,
            ChunkType::UTF16 | ChunkType::UTF16_ALT => self.read_utf16()?,
            ChunkType::ARRAY => self.read_array(depth)?,
            ChunkType::RECORDS => self.read_records(depth)?,
            _ => return Ok(None),
        };

        Ok(Some(data))
    }

    fn skip_compressed(&mut self) -> Result<(), CivError> {
        let start = self.cursor.position();
        let end = self
            .cursor
            .find_next(&COMPRESSED_DATA_END, start)
            .ok_or_else(|| CivError::truncated(start, COMPRESSED_DATA_END.len(), self.cursor.len()))?;

        tracing::debug!(start, end, "skipping compressed region");
        self.cursor.set_position(end + COMPRESSED_DATA_END.len())
    }

    fn read_string(&mut self) -> Result<ChunkData, CivError> {
        let offset = self.cursor.position();

        // The length is read as 24 bits even though only 16 are consumed,
        // the third byte doubles as the first descriptor byte.
        let len = self.cursor.peek_u24_le()? as usize;
        self.cursor.skip(2)?;

        let descriptor = self.cursor.peek_bytes(6)?;
        match descriptor[1] {
            0x00 | 0x20 => {
                tracing::debug!(offset, "unresolved string variant");
                self.cursor.skip(10)?;
                Ok(ChunkData::UnresolvedString)
            }
            STRING_PLAIN => {
                self.cursor.skip(6)?;
                let text = self.cursor.read_fixed_string(len, TextEncoding::Utf8)?;
                Ok(ChunkData::Str(text))
            }
            flag => Err(CivError::from(CivErrorKind::InvalidString { offset, flag })),
        }
    }

    fn read_utf16(&mut self) -> Result<ChunkData, CivError> {
        let offset = self.cursor.position();
        let len = usize::from(self.cursor.read_u16_le()?) * 2;

        let descriptor = self.cursor.peek_bytes(6)?;
        if descriptor != UTF16_DESCRIPTOR {
            let flag = descriptor[1];
            return Err(CivError::from(CivErrorKind::InvalidString { offset, flag }));
        }
        self.cursor.skip(6)?;

        // trailing NUL terminator
        let text_len = len.saturating_sub(2);
        let text = self
            .cursor
            .read_fixed_string(text_len, TextEncoding::Utf16Le)?;
        self.cursor.skip(len - text_len)?;
        Ok(ChunkData::Str(text))
    }

    fn read_array(&mut self, depth: usize) -> Result<ChunkData, CivError> {
        let depth = self.nest(depth)?;
        self.cursor.skip(8)?;
        let count = self.cursor.read_u32_le()?;

        let mut result = Vec::new();
        for _ in 0..count {
            let entry = self.next_chunk(true, depth)?;
            result.push(entry.data);
        }

        Ok(ChunkData::Array(result))
    }

    fn read_records(&mut self, depth: usize) -> Result<ChunkData, CivError> {
        let depth = self.nest(depth)?;
        self.cursor.skip(8)?;
        let count = self.cursor.read_u32_le()?;

        let mut result = Vec::new();
        for _ in 0..count {
            let offset = self.cursor.position();
            if self.cursor.peek_bytes(1)? != [ChunkType::ARRAY.0 as u8] {
                return Err(CivError::from(CivErrorKind::InvalidRecordArray { offset }));
            }
            self.cursor.skip(16)?;

            let mut record = Record::new();
            loop {
                let chunk = self.next_chunk(false, depth)?;
                let done = chunk.data.is_record_terminator();
                if let Some(field) = ActorField::from_marker(chunk.marker) {
                    record.insert(field, chunk.data);
                }

                if done {
                    break;
                }
            }

            result.push(record);
        }

        Ok(ChunkData::Records(result))
    }

    fn nest(&self, depth: usize) -> Result<usize, CivError> {
        if depth >= MAX_DEPTH {
            let offset = self.cursor.position();
            Err(CivError::from(CivErrorKind::DepthExceeded { offset }))
        } else {
            Ok(depth + 1)
        }
    }
}
