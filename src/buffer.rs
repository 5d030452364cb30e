//! Fixed-capacity token buffer.

use thiserror::Error;

/// Raised when a token does not fit into a [`TokenBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("token exceeds buffer capacity of {capacity} bytes")]
pub struct Overflow {
    /// Capacity of the buffer that overflowed.
    pub capacity: usize,
}

/// Append-only byte sink collecting the token currently being scanned.
///
/// Storage is allocated once and never grows. At most `capacity - 1` bytes
/// are held at a time; the next append fails with [`Overflow`] instead of
/// truncating or reallocating.
#[derive(Debug, Clone)]
pub struct TokenBuffer {
    bytes: Box<[u8]>,
    position: usize,
}

impl TokenBuffer {
    /// Create an empty buffer with a fixed `capacity`.
    pub fn with_capacity(capacity: usize) -> TokenBuffer {
        TokenBuffer {
            bytes: vec![0; capacity].into_boxed_slice(),
            position: 0,
        }
    }

    /// Store one byte at the end of the current token.
    #[inline]
    pub fn append(&mut self, byte: u8) -> Result<(), Overflow> {
        if self.position + 1 < self.bytes.len() {
            self.bytes[self.position] = byte;
            self.position += 1;
            Ok(())
        } else {
            Err(Overflow { capacity: self.bytes.len() })
        }
    }

    /// Forget the current token. Storage is kept.
    #[inline]
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Bytes of the current token.
    #[inline]
    pub fn contents(&self) -> &[u8] {
        &self.bytes[..self.position]
    }

    /// Number of bytes held.
    #[inline]
    pub fn len(&self) -> usize {
        self.position
    }

    /// `true` when no byte of the current token has been stored yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    /// Size of the underlying storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl PartialEq for TokenBuffer {
    fn eq(&self, other: &TokenBuffer) -> bool {
        self.capacity() == other.capacity() && self.contents() == other.contents()
    }
}

impl Eq for TokenBuffer {}
