//! Bounded specifier arena.
//!
//! Wraps the pool-backed specifier array with its length so that writing
//! past capacity is a checked `BufferTooSmall` instead of a stray store.

use super::specifier::FormatSpecifier;
use crate::status::{PrintError, PrintResult};

pub struct SpecArena<'s> {
    slots: &'s mut [FormatSpecifier],
    len: usize,
}

impl<'s> SpecArena<'s> {
    /// Take over `slots`, zeroing every entry.
    pub fn new(slots: &'s mut [FormatSpecifier]) -> Self {
        slots.fill(FormatSpecifier::default());
        Self { slots, len: 0 }
    }

    /// Append a finalized record.
    pub fn push(&mut self, spec: FormatSpecifier) -> PrintResult<()> {
        let slot = self.slots.get_mut(self.len).ok_or(PrintError::BufferTooSmall)?;
        *slot = spec;
        self.len += 1;
        Ok(())
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
        self.slots.len()
    }

    /// Finalized records, in push order.
    pub fn as_slice(&self) -> &[FormatSpecifier] {
        &self.slots[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut slots = [FormatSpecifier::open(9); 2];
        let mut arena = SpecArena::new(&mut slots);
        assert_eq!(arena.capacity(), 2);
        assert!(arena.is_empty());

        arena.push(FormatSpecifier::open(1)).unwrap();
        arena.push(FormatSpecifier::open(5)).unwrap();
        assert_eq!(
            arena.push(FormatSpecifier::open(8)),
            Err(PrintError::BufferTooSmall)
        );

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.as_slice()[1].location, 5);
    }

    #[test]
    fn test_new_zeroes_storage() {
        let mut slots = [FormatSpecifier::open(42); 3];
        {
            let arena = SpecArena::new(&mut slots);
            assert!(arena.as_slice().is_empty());
        }
        assert!(slots.iter().all(|s| *s == FormatSpecifier::default()));
    }

    #[test]
    fn test_zero_capacity() {
        let mut slots: [FormatSpecifier; 0] = [];
        let mut arena = SpecArena::new(&mut slots);
        assert_eq!(
            arena.push(FormatSpecifier::default()),
            Err(PrintError::BufferTooSmall)
        );
    }
}
