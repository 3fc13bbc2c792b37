use tracing::warn;

use crate::error::{EngineError, Result};

/// Double-buffered cell state. `front` selects which buffer is current; the
/// other is the next generation under construction. Swapping flips `front`,
/// the buffers themselves never move.
#[derive(Clone, Debug)]
pub struct StateStore {
    buffers: [Vec<bool>; 2],
    front: usize,
    /// Per-index write marks for `write_next`. Allocated on first use.
    staged: Vec<bool>,
    pending: usize,
}

impl StateStore {
    /// All cells dead.
    pub fn new(len: usize) -> Self {
        Self::from_cells(vec![false; len])
    }

    pub fn from_cells(cells: Vec<bool>) -> Self {
        let len = cells.len();
        Self {
            buffers: [cells, vec![false; len]],
            front: 0,
            staged: Vec::new(),
            pending: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffers[0].len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn current(&self) -> &[bool] {
        &self.buffers[self.front]
    }

    /// Write one cell of the next generation. Each index may be written at
    /// most once per generation, and a generation written this way must
    /// cover every index before `swap`.
    pub fn write_next(&mut self, index: usize, value: bool) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(EngineError::IndexOutOfRange { index, len });
        }
        if self.staged.is_empty() {
            self.staged = vec![false; len];
        }
        if self.staged[index] {
            return Err(violation("next-buffer index written twice in one generation"));
        }
        self.staged[index] = true;
        self.pending += 1;
        self.buffers[self.front ^ 1][index] = value;
        Ok(())
    }

    /// Read view of current plus exclusive view of next, for a scheduler that
    /// overwrites the whole next buffer. Refused while `write_next` writes
    /// are staged so the two write paths never mix within a generation.
    pub fn split(&mut self) -> Result<(&[bool], &mut [bool])> {
        if self.pending != 0 {
            return Err(violation("next buffer has staged writes"));
        }
        let (a, b) = self.buffers.split_at_mut(1);
        Ok(if self.front == 0 {
            (&a[0][..], &mut b[0][..])
        } else {
            (&b[0][..], &mut a[0][..])
        })
    }

    /// Exchange current and next. O(1) unless `write_next` was used, in
    /// which case the write marks are cleared too.
    pub fn swap(&mut self) -> Result<()> {
        if self.pending != 0 && self.pending != self.len() {
            return Err(violation("swap with a partially written next buffer"));
        }
        if self.pending != 0 {
            self.staged.fill(false);
            self.pending = 0;
        }
        self.front ^= 1;
        Ok(())
    }

    pub fn population(&self) -> usize {
        self.current().iter().filter(|&&alive| alive).count()
    }
}

fn violation(what: &'static str) -> EngineError {
    warn!(what, "state store precondition violated");
    EngineError::PreconditionViolation(what)
}
