//! Calendar expander — the inclusive day sequence between two timestamps.

use chrono::{Duration, NaiveDateTime};

/// Lazy sequence of timestamps from `start`, stepping exactly 24 hours, while
/// not past `end`.
///
/// The time-of-day of `start` is kept, not normalized to midnight.
#[derive(Debug, Clone)]
pub struct DateSequence {
    next: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateSequence {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { next: start, end }
    }

    /// Number of days still to be yielded.
    pub fn remaining(&self) -> usize {
        if self.next > self.end {
            return 0;
        }
        ((self.end - self.next).num_days() + 1) as usize
    }
}

impl Iterator for DateSequence {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.end {
            return None;
        }
        let current = self.next;
        self.next = current + Duration::days(1);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for DateSequence {}
