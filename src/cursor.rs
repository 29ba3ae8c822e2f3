use crate::{marker::Marker, CivError};

/// How the bytes of a fixed length string are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// 8 bits per unit. Embedded NUL bytes are dropped.
    Utf8,

    /// 16 bits per unit, little endian
    Utf16Le,
}

/// A position tracking view over a save's bytes.
///
/// Every read is bounds checked and advances the position by exactly the
/// number of bytes it consumed. A read that would run off the end of the
/// buffer returns a truncation error and leaves the position untouched.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0 }
    }

    /// The entire underlying buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn set_position(&mut self, pos: usize) -> Result<(), CivError> {
        if pos > self.data.len() {
            return Err(CivError::truncated(pos, 0, self.data.len()));
        }

        self.pos = pos;
        Ok(())
    }

    /// Step the position backwards, saturating at the start of the buffer
    pub fn rewind(&mut self, n: usize) {
        self.pos = self.pos.saturating_sub(n);
    }

    #[inline]
    fn slice_at(&self, offset: usize, n: usize) -> Result<&'a [u8], CivError> {
        offset
            .checked_add(n)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| CivError::truncated(offset, n, self.data.len()))
    }

    #[inline]
    fn array_at<const N: usize>(&self, offset: usize) -> Result<[u8; N], CivError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice_at(offset, N)?);
        Ok(out)
    }

    pub fn peek_bytes(&self, n: usize) -> Result<&'a [u8], CivError> {
        self.slice_at(self.pos, n)
    }

    /// Returns true if the upcoming bytes equal the pattern. Running out of
    /// data is not an error here, it simply doesn't match.
    pub fn starts_with(&self, pattern: &[u8]) -> bool {
        self.data[self.pos..].starts_with(pattern)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CivError> {
        let result = self.slice_at(self.pos, n)?;
        self.pos += n;
        Ok(result)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), CivError> {
        self.slice_at(self.pos, n)?;
        self.pos += n;
        Ok(())
    }

    /// The 4 byte window at the cursor without advancing
    pub fn peek_marker(&self) -> Result<Marker, CivError> {
        self.array_at::<4>(self.pos).map(Marker::new)
    }

    pub fn read_marker(&mut self) -> Result<Marker, CivError> {
        let result = self.peek_marker()?;
        self.pos += 4;
        Ok(result)
    }

    pub fn read_u8(&mut self) -> Result<u8, CivError> {
        let [result] = self.array_at::<1>(self.pos)?;
        self.pos += 1;
        Ok(result)
    }

    pub fn read_u16_le(&mut self) -> Result<u16, CivError> {
        let result = u16::from_le_bytes(self.array_at(self.pos)?);
        self.pos += 2;
        Ok(result)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, CivError> {
        let result = u32::from_le_bytes(self.array_at(self.pos)?);
        self.pos += 4;
        Ok(result)
    }

    pub fn read_u64_le(&mut self) -> Result<u64, CivError> {
        let result = u64::from_le_bytes(self.array_at(self.pos)?);
        self.pos += 8;
        Ok(result)
    }

    /// Little endian 24 bit integer at the cursor without advancing
    pub fn peek_u24_le(&self) -> Result<u32, CivError> {
        let [a, b, c] = self.array_at::<3>(self.pos)?;
        Ok(u32::from_le_bytes([a, b, c, 0]))
    }

    /// Little endian 32 bit integer at an absolute offset without moving
    pub fn u32_at(&self, offset: usize) -> Result<u32, CivError> {
        self.array_at(offset).map(u32::from_le_bytes)
    }

    /// The byte `offset` bytes past the cursor interpreted as a boolean,
    /// without advancing
    pub fn bool_at(&self, offset: usize) -> Result<bool, CivError> {
        let [b] = self.array_at::<1>(self.pos + offset)?;
        Ok(b != 0)
    }

    /// Decode `len` bytes as text. Invalid sequences are replaced with
    /// U+FFFD rather than failing as player supplied names may contain
    /// arbitrary bytes.
    pub fn read_fixed_string(
        &mut self,
        len: usize,
        encoding: TextEncoding,
    ) -> Result<String, CivError> {
        let data = self.read_bytes(len)?;
        let result = match encoding {
            TextEncoding::Utf8 => {
                let text = String::from_utf8_lossy(data);
                if text.contains('\0') {
                    text.replace('\0', "")
                } else {
                    text.into_owned()
                }
            }
            TextEncoding::Utf16Le => {
                let units = data
                    .chunks_exact(2)
                    .map(|x| u16::from_le_bytes([x[0], x[1]]))
                    .collect::<Vec<_>>();
                String::from_utf16_lossy(&units)
            }
        };

        Ok(result)
    }

    /// Absolute offset of the next occurrence of `pattern` at or after `from`
    pub fn find_next(&self, pattern: &[u8], from: usize) -> Option<usize> {
        if pattern.is_empty() {
            return Some(from);
        }

        self.data
            .get(from..)?
            .windows(pattern.len())
            .position(|window| window == pattern)
            .map(|idx| idx + from)
    }
}
