//! Monotonic id sequences

/// Hands out increasing ids for one collection.
///
/// Seeded past the largest id already persisted, so ids stay unique across
/// restarts without relying on the clock. Once `u64::MAX` has been used the
/// sequence is exhausted and `peek` returns `None`.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: Option<u64>,
}

impl IdSequence {
    pub fn starting_after<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let next = match existing.into_iter().max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        Self { next }
    }

    /// The id the next record gets, if any remain
    pub fn peek(&self) -> Option<u64> {
        self.next
    }

    /// Mark the peeked id as used
    pub fn advance(&mut self) {
        self.next = self.next.and_then(|id| id.checked_add(1));
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: Some(1) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_starts_at_one() {
        let mut seq = IdSequence::starting_after(std::iter::empty());
        assert_eq!(seq.peek(), Some(1));
        seq.advance();
        assert_eq!(seq.peek(), Some(2));
    }

    #[test]
    fn continues_after_largest_existing_id() {
        let mut seq = IdSequence::starting_after([4, 17, 9]);
        assert_eq!(seq.peek(), Some(18));
        seq.advance();
        assert_eq!(seq.peek(), Some(19));
    }

    #[test]
    fn exhausted_after_max_id() {
        let seq = IdSequence::starting_after([3, u64::MAX]);
        assert_eq!(seq.peek(), None);

        let mut seq = IdSequence::starting_after([u64::MAX - 1]);
        assert_eq!(seq.peek(), Some(u64::MAX));
        seq.advance();
        assert_eq!(seq.peek(), None);
        seq.advance();
        assert_eq!(seq.peek(), None);
    }
}
