//! `SurveyQueue` — priority queue of survey plans with FIFO tiebreak.
//!
//! # Ordering
//!
//! Entries pop in ascending `(priority, sequence)` order.  The sequence is a
//! monotonically increasing counter stamped at push time, so two entries with
//! the same priority always pop in the order they were pushed — the heap
//! never has to fall back on comparing the keys themselves.
//!
//! | Priority        | Value | Meaning                                      |
//! |-----------------|-------|----------------------------------------------|
//! | `Unfinished`    | 1     | partially surveyed yesterday; resume first   |
//! | `Skipped`       | 2     | in yesterday's workplan but never started    |
//! | `Default`       | 3     | newly due                                    |
//!
//! `BinaryHeap` gives O(log n) push and pop.  Queues hold at most one entry
//! per site, so n is bounded by the site count.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Queue priority of a survey plan.  Lower values pop first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurveyPriority {
    /// Partially surveyed; resumes ahead of everything else.
    Unfinished = 1,
    Skipped    = 2,
    Default    = 3,
}

impl SurveyPriority {
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// A min-heap of `K` keyed on `(priority, insertion sequence)`.
#[derive(Clone, Debug)]
pub struct SurveyQueue<K: Ord> {
    heap:     BinaryHeap<Reverse<(SurveyPriority, u64, K)>>,
    next_seq: u64,
}

impl<K: Ord> Default for SurveyQueue<K> {
    fn default() -> Self {
        Self { heap: BinaryHeap::new(), next_seq: 0 }
    }
}

impl<K: Ord + Copy> SurveyQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `key` at `priority`.
    ///
    /// The queue does not deduplicate; callers guard with the planner's
    /// `queued` flag.
    pub fn push(&mut self, key: K, priority: SurveyPriority) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse((priority, seq, key)));
    }

    /// Remove and return the most urgent entry, or `None` if empty.
    pub fn pop(&mut self) -> Option<(K, SurveyPriority)> {
        self.heap.pop().map(|Reverse((p, _, k))| (k, p))
    }

    /// Pop up to `n` entries.  Returns fewer if the queue runs dry.
    pub fn pop_many(&mut self, n: usize) -> Vec<(K, SurveyPriority)> {
        let mut out = Vec::with_capacity(n.min(self.heap.len()));
        while out.len() < n {
            match self.pop() {
                Some(entry) => out.push(entry),
                None => break,
            }
        }
        out
    }

    /// The entry that would pop next, without removing it.
    pub fn peek(&self) -> Option<(K, SurveyPriority)> {
        self.heap.peek().map(|Reverse((p, _, k))| (*k, *p))
    }

    /// Priority of `key` if it is queued.  O(n); diagnostics and tests only.
    pub fn priority_of(&self, key: K) -> Option<SurveyPriority> {
        self.heap
            .iter()
            .find(|Reverse((_, _, k))| *k == key)
            .map(|Reverse((p, _, _))| *p)
    }

    /// Number of entries for `key`.  O(n).
    pub fn count_of(&self, key: K) -> usize {
        self.heap.iter().filter(|Reverse((_, _, k))| *k == key).count()
    }

    /// All queued keys in pop order.  O(n log n).
    pub fn keys_in_order(&self) -> Vec<K> {
        let mut entries: Vec<_> = self.heap.iter().map(|Reverse(e)| *e).collect();
        entries.sort_unstable_by_key(|&(p, seq, _)| (p, seq));
        entries.into_iter().map(|(_, _, k)| k).collect()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
