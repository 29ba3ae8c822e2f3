use std::fmt;

/// A 4 byte tag that identifies the semantic role of a chunk.
///
/// Tags are opaque hashes and are only meaningful when looked up in a
/// format's marker table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Marker(pub [u8; 4]);

impl Marker {
    #[inline]
    pub const fn new(data: [u8; 4]) -> Self {
        Marker(data)
    }

    /// The tag interpreted as a little endian integer
    #[inline]
    pub const fn value(&self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Marker({})", self)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{:02X} {:02X} {:02X} {:02X}", a, b, c, d)
    }
}
