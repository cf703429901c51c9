//! Write cursor for the fixed-size vertex ring.

/// A block of ring slots handed out for one draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingSpan {
    /// First sprite slot.
    pub first_slot: u32,
    /// Sprites packed into this span.
    pub count: u32,
    /// Tail slots skipped to rewind the cursor before this span.
    pub discarded: u32,
}

/// Persistent position in the vertex ring, in sprite slots.
///
/// The cursor only moves forward, across batches and across frames. When
/// the space left is too small for the outstanding sprites it either hands
/// out that space (if at least `min_batch` slots remain) or abandons it and
/// rewinds to slot 0.
#[derive(Debug, Clone)]
pub struct RingCursor {
    position: u32,
    max_batch: u32,
    min_batch: u32,
}

impl RingCursor {
    pub fn new(max_batch: u32, min_batch: u32) -> Self {
        Self {
            position: 0,
            max_batch,
            min_batch,
        }
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn capacity(&self) -> u32 {
        self.max_batch
    }

    /// Claim the next span for `outstanding` sprites and advance past it.
    ///
    /// The span may cover fewer sprites than requested; keep reserving until
    /// the outstanding count reaches zero. `outstanding` must be non-zero.
    pub fn reserve(&mut self, outstanding: u32) -> RingSpan {
        let remaining = self.max_batch - self.position;
        let mut discarded = 0;

        let count = if outstanding <= remaining {
            outstanding
        } else if remaining < self.min_batch {
            discarded = remaining;
            self.position = 0;
            outstanding.min(self.max_batch)
        } else {
            remaining
        };

        let span = RingSpan {
            first_slot: self.position,
            count,
            discarded,
        };
        self.position += count;
        span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor_at(position: u32) -> RingCursor {
        let mut cursor = RingCursor::new(200, 20);
        if position > 0 {
            cursor.reserve(position);
        }
        assert_eq!(cursor.position(), position);
        cursor
    }

    #[test]
    fn test_fits_at_cursor() {
        let mut cursor = cursor_at(10);
        let span = cursor.reserve(50);
        assert_eq!(span, RingSpan { first_slot: 10, count: 50, discarded: 0 });
        assert_eq!(cursor.position(), 60);
    }

    #[test]
    fn test_small_tail_rewinds() {
        let mut cursor = cursor_at(185);
        let span = cursor.reserve(190);
        assert_eq!(span, RingSpan { first_slot: 0, count: 190, discarded: 15 });
        assert_eq!(cursor.position(), 190);
    }

    #[test]
    fn test_large_tail_splits() {
        let mut cursor = cursor_at(170);
        let first = cursor.reserve(50);
        assert_eq!(first, RingSpan { first_slot: 170, count: 30, discarded: 0 });

        let second = cursor.reserve(50 - first.count);
        assert_eq!(second, RingSpan { first_slot: 0, count: 20, discarded: 0 });
        assert_eq!(cursor.position(), 20);
    }

    #[test]
    fn test_exact_fill_then_rewind() {
        let mut cursor = cursor_at(0);
        assert_eq!(cursor.reserve(200).count, 200);
        assert_eq!(cursor.position(), 200);

        let span = cursor.reserve(1);
        assert_eq!(span, RingSpan { first_slot: 0, count: 1, discarded: 0 });
    }

    #[test]
    fn test_oversized_request_is_capped() {
        let mut cursor = cursor_at(190);
        let span = cursor.reserve(500);
        assert_eq!(span, RingSpan { first_slot: 0, count: 200, discarded: 10 });
    }

    #[test]
    fn test_tail_equal_to_min_is_used() {
        let mut cursor = cursor_at(180);
        let span = cursor.reserve(25);
        assert_eq!(span, RingSpan { first_slot: 180, count: 20, discarded: 0 });
    }
}
