//! Draw-without-replacement pool shared by the quote finders.

use rand::Rng;

/// A shrinking set of candidate indices awaiting random sampling.
///
/// Every index in `0..len` is handed out at most once; the pool is exhausted
/// once all of them have been drawn.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    remaining: Vec<usize>,
}

impl CandidatePool {
    /// Creates a pool holding the indices `0..len`.
    pub fn new(len: usize) -> Self {
        CandidatePool {
            remaining: (0..len).collect(),
        }
    }

    /// Removes and returns a uniformly random index, or `None` once exhausted.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.remaining.is_empty() {
            return None;
        }
        let slot = rng.gen_range(0..self.remaining.len());
        Some(self.remaining.swap_remove(slot))
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}
