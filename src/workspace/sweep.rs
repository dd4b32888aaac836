use std::collections::BTreeSet;

/// Active set of half-open intervals `[start, end)` at a moving query position.
///
/// Intervals are indexed twice, by start and by end. Moving the position only touches entries
/// whose boundary lies between the old and the new position, so playback in either direction
/// costs time proportional to the boundaries crossed rather than to the number of intervals.
#[derive(Debug)]
pub(crate) struct IntervalSweep<K> {
    by_start: Vec<(i64, K)>,
    by_end: Vec<(i64, K)>,
    /// Entries of `by_start` with `start <= pos`.
    started: usize,
    /// Entries of `by_end` with `end <= pos`.
    ended: usize,
    pos: Option<i64>,
    active: BTreeSet<K>,
}

impl<K> Default for IntervalSweep<K> {
    fn default() -> Self {
        Self {
            by_start: Vec::new(),
            by_end: Vec::new(),
            started: 0,
            ended: 0,
            pos: None,
            active: BTreeSet::new(),
        }
    }
}

impl<K: Copy + Ord> IntervalSweep<K> {
    /// Re-index from scratch; the next [`IntervalSweep::seek`] starts from an empty active set.
    pub(crate) fn rebuild(&mut self, intervals: impl IntoIterator<Item = (K, i64, i64)>) {
        self.by_start.clear();
        self.by_end.clear();
        for (key, start, end) in intervals {
            self.by_start.push((start, key));
            self.by_end.push((end, key));
        }
        self.by_start.sort_unstable();
        self.by_end.sort_unstable();
        self.reset();
    }

    fn reset(&mut self) {
        self.started = 0;
        self.ended = 0;
        self.pos = None;
        self.active.clear();
    }

    /// Move to `pos` and return the keys active there.
    pub(crate) fn seek(&mut self, pos: i64) -> &BTreeSet<K> {
        match self.pos {
            None => self.forward(pos),
            Some(p) if pos > p => self.forward(pos),
            Some(p) if pos < p => self.backward(pos),
            Some(_) => {}
        }
        self.pos = Some(pos);
        &self.active
    }

    /// Current position, if any query happened since the last rebuild.
    #[cfg(test)]
    pub(crate) fn position(&self) -> Option<i64> {
        self.pos
    }

    fn forward(&mut self, pos: i64) {
        // Add before removing so intervals entirely inside the jump cancel out.
        while let Some(&(start, key)) = self.by_start.get(self.started) {
            if start > pos {
                break;
            }
            self.active.insert(key);
            self.started += 1;
        }
        while let Some(&(end, key)) = self.by_end.get(self.ended) {
            if end > pos {
                break;
            }
            self.active.remove(&key);
            self.ended += 1;
        }
    }

    fn backward(&mut self, pos: i64) {
        while self.ended > 0 {
            let (end, key) = self.by_end[self.ended - 1];
            if end <= pos {
                break;
            }
            self.active.insert(key);
            self.ended -= 1;
        }
        while self.started > 0 {
            let (start, key) = self.by_start[self.started - 1];
            if start <= pos {
                break;
            }
            self.active.remove(&key);
            self.started -= 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/workspace/sweep.rs"]
mod tests;
