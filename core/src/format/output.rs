//! Bounded byte buffer used for both the composed output and the
//! per-argument scratch. Every write is checked against capacity.

use core::fmt;

use crate::status::{PrintError, PrintResult};

pub struct OutputBuffer<'b> {
    buf: &'b mut [u8],
    len: usize,
}

impl<'b> OutputBuffer<'b> {
    pub fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Drop everything past `len`.
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    pub fn push(&mut self, byte: u8) -> PrintResult<()> {
        let slot = self.buf.get_mut(self.len).ok_or(PrintError::BufferTooSmall)?;
        *slot = byte;
        self.len += 1;
        Ok(())
    }

    pub fn extend(&mut self, bytes: &[u8]) -> PrintResult<()> {
        if bytes.len() > self.remaining() {
            return Err(PrintError::BufferTooSmall);
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    /// Append `count` copies of `byte`.
    pub fn pad(&mut self, byte: u8, count: usize) -> PrintResult<()> {
        if count > self.remaining() {
            return Err(PrintError::BufferTooSmall);
        }
        self.buf[self.len..self.len + count].fill(byte);
        self.len += count;
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Write for OutputBuffer<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.extend(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
