use super::markers::{GROUP_COUNT, GROUP_COUNT_LOOKBACK, HEADER_LEN};
use crate::{
    cursor::{ByteCursor, TextEncoding},
    marker::Marker,
    CivError, CivErrorKind,
};
use std::fmt;

/// Type code of a Civ VII chunk
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub u32);

impl ChunkType {
    pub const UNKNOWN_12: ChunkType = ChunkType(0x01);
    pub const INT: ChunkType = ChunkType(0x02);
    pub const STRING: ChunkType = ChunkType(0x04);
    pub const UTF16: ChunkType = ChunkType(0x05);
    pub const WORDS_32: ChunkType = ChunkType(0x06);
    pub const WORDS_64: ChunkType = ChunkType(0x07);
    pub const WORDS_64_ALT: ChunkType = ChunkType(0x08);
    pub const WORDS_64_ALT2: ChunkType = ChunkType(0x09);
    pub const NESTED_ARRAY: ChunkType = ChunkType(0x0A);
    pub const CHUNK_ARRAY: ChunkType = ChunkType(0x0B);
    pub const UNKNOWN_12_ALT: ChunkType = ChunkType(0x15);
    pub const OPAQUE: ChunkType = ChunkType(0x18);
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({:#x})", self.0)
    }
}

/// The decoded payload of a chunk
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkValue {
    /// A fixed size payload whose meaning is not known
    Unknown,
    Words32(Vec<u32>),
    Words64(Vec<u64>),
    Int(u32),
    Utf8(String),
    Utf16(String),

    /// Sub-chunks of a chunk array
    Chunks(Vec<Chunk>),

    /// A doubly nested array that is decoded only to find its end
    Nested { entries: usize },

    /// Length of a payload that is stepped over
    Opaque { len: usize },
}

impl ChunkValue {
    pub fn as_int(&self) -> Option<u32> {
        match self {
            ChunkValue::Int(x) => Some(*x),
            _ => None,
        }
    }

    /// Text of either string encoding
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ChunkValue::Utf8(x) | ChunkValue::Utf16(x) => Some(x.as_str()),
            _ => None,
        }
    }

    pub fn as_chunks(&self) -> Option<&[Chunk]> {
        match self {
            ChunkValue::Chunks(x) => Some(x.as_slice()),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChunkValue::Unknown => "unknown",
            ChunkValue::Words32(_) => "32 bit words",
            ChunkValue::Words64(_) => "64 bit words",
            ChunkValue::Int(_) => "int",
            ChunkValue::Utf8(_) => "string",
            ChunkValue::Utf16(_) => "utf-16 string",
            ChunkValue::Chunks(_) => "chunk array",
            ChunkValue::Nested { .. } => "nested array",
            ChunkValue::Opaque { .. } => "opaque",
        }
    }
}

/// A decoded Civ VII chunk
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Offset of the marker in the file
    pub offset: usize,

    /// Offset of the payload, past the marker, type, and reserved word
    pub data_start: usize,

    /// Offset one past the last byte of the payload
    pub end: usize,
    pub marker: Marker,
    pub chunk_type: ChunkType,
    pub value: ChunkValue,
}

impl Chunk {
    pub(crate) fn int(&self) -> Result<u32, CivError> {
        self.value.as_int().ok_or_else(|| self.unexpected())
    }

    pub(crate) fn str(&self) -> Result<&str, CivError> {
        self.value.as_str().ok_or_else(|| self.unexpected())
    }

    fn unexpected(&self) -> CivError {
        CivError::from(CivErrorKind::UnexpectedValue {
            marker: self.marker,
            found: self.value.kind(),
        })
    }
}

const MAX_DEPTH: usize = 16;
const FIXED_UNKNOWN_LEN: usize = 12;
const INT_PREFIX_LEN: usize = 8;

/// Decode a single chunk at the cursor
pub(crate) fn read_chunk(cursor: &mut ByteCursor, depth: usize) -> Result<Chunk, CivError> {
    let offset = cursor.position();
    let marker = cursor.read_marker()?;
    let chunk_type = ChunkType(cursor.read_u32_le()?);
    cursor.skip(4)?;
    let data_start = cursor.position();

    let value = match chunk_type {
        ChunkType::UNKNOWN_12 | ChunkType::UNKNOWN_12_ALT => {
            cursor.skip(FIXED_UNKNOWN_LEN)?;
            ChunkValue::Unknown
        }
        ChunkType::WORDS_32 => {
            let count = usize::from(cursor.read_u16_le()?);
            cursor.peek_bytes(count * 4)?;
            let words = (0..count)
                .map(|_| cursor.read_u32_le())
                .collect::<Result<Vec<_>, _>>()?;
            ChunkValue::Words32(words)
        }
        ChunkType::WORDS_64 | ChunkType::WORDS_64_ALT | ChunkType::WORDS_64_ALT2 => {
            let count = usize::from(cursor.read_u16_le()?);
            cursor.peek_bytes(count * 8)?;
            let words = (0..count)
                .map(|_| cursor.read_u64_le())
                .collect::<Result<Vec<_>, _>>()?;
            ChunkValue::Words64(words)
        }
        ChunkType::INT => {
            cursor.skip(INT_PREFIX_LEN)?;
            ChunkValue::Int(cursor.read_u32_le()?)
        }
        ChunkType::STRING => {
            let len = usize::from(cursor.read_u16_le()?);
            ChunkValue::Utf8(read_terminated(cursor, len, 1, TextEncoding::Utf8)?)
        }
        ChunkType::UTF16 => {
            let units = usize::from(cursor.read_u16_le()?);
            ChunkValue::Utf16(read_terminated(
                cursor,
                units * 2,
                2,
                TextEncoding::Utf16Le,
            )?)
        }
        ChunkType::CHUNK_ARRAY => {
            let depth = nest(depth, offset)?;
            let count = cursor.read_u32_le()?;
            let chunks = (0..count)
                .map(|_| read_chunk(cursor, depth))
                .collect::<Result<Vec<_>, _>>()?;
            ChunkValue::Chunks(chunks)
        }
        ChunkType::NESTED_ARRAY => {
            let depth = nest(depth, offset)?;
            let outer = cursor.read_u32_le()?;
            for _ in 0..outer {
                let inner = cursor.read_u32_le()?;
                for _ in 0..inner {
                    read_chunk(cursor, depth)?;
                }
            }
            ChunkValue::Nested {
                entries: outer as usize,
            }
        }
        ChunkType::OPAQUE => {
            let len = cursor.read_u32_le()? as usize;
            cursor.skip(len)?;
            ChunkValue::Opaque { len }
        }
        _ => {
            return Err(CivError::from(CivErrorKind::UnrecognizedChunkType {
                offset,
                chunk_type: chunk_type.0,
            }))
        }
    };

    let chunk = Chunk {
        offset,
        data_start,
        end: cursor.position(),
        marker,
        chunk_type,
        value,
    };

    tracing::trace!(offset, %marker, chunk_type = chunk_type.0, kind = chunk.value.kind(), "decoded chunk");
    Ok(chunk)
}

/// Decode `len` bytes of text of which the last `terminator` bytes are not
/// part of the string
fn read_terminated(
    cursor: &mut ByteCursor,
    len: usize,
    terminator: usize,
    encoding: TextEncoding,
) -> Result<String, CivError> {
    cursor.peek_bytes(len)?;
    let text_len = len.saturating_sub(terminator);
    let text = cursor.read_fixed_string(text_len, encoding)?;
    cursor.skip(len - text_len)?;
    Ok(text)
}

fn nest(depth: usize, offset: usize) -> Result<usize, CivError> {
    if depth >= MAX_DEPTH {
        Err(CivError::from(CivErrorKind::DepthExceeded { offset }))
    } else {
        Ok(depth + 1)
    }
}

/// The chunks of each of the five groups, in order
pub type Groups = [Vec<Chunk>; GROUP_COUNT];

/// Decode the five chunk groups that follow the header. The magic is not
/// checked.
pub fn decode_groups(data: &[u8]) -> Result<Groups, CivError> {
    let mut cursor = ByteCursor::new(data);
    cursor.set_position(HEADER_LEN)?;

    let mut groups: Groups = Default::default();
    let mut prev_end = HEADER_LEN;
    for (group, &lookback) in groups.iter_mut().zip(GROUP_COUNT_LOOKBACK.iter()) {
        let count_offset = prev_end
            .checked_sub(lookback)
            .ok_or_else(|| CivError::truncated(prev_end, lookback, data.len()))?;
        let count = cursor.u32_at(count_offset)?;

        let start = if lookback == 0 { prev_end + 4 } else { prev_end };
        cursor.set_position(start)?;

        for _ in 0..count {
            group.push(read_chunk(&mut cursor, 0)?);
        }

        prev_end = cursor.position();
        tracing::trace!(start, end = prev_end, count, "decoded chunk group");
    }

    Ok(groups)
}
