//! Track queue.
//!
//! Every mutation validates first and then runs a caller-supplied commit
//! closure while the lock is still held, so the engine's item list is
//! updated in the same order as the queue.

use crate::error::{PlaybackError, Result};
use bridge_traits::Track;

#[derive(Debug, Default)]
pub struct Queue {
    tracks: parking_lot::Mutex<Vec<Track>>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.lock().is_empty()
    }

    /// Copy of the track at `index`.
    pub fn get(&self, index: usize) -> Option<Track> {
        self.tracks.lock().get(index).cloned()
    }

    /// Copy of the whole queue.
    pub fn snapshot(&self) -> Vec<Track> {
        self.tracks.lock().clone()
    }

    /// Insert `tracks` before `before`, or append when `None`.
    ///
    /// `commit` receives the insertion index and the inserted tracks.
    /// Returns the insertion index.
    pub fn insert_with<F>(
        &self,
        tracks: Vec<Track>,
        before: Option<usize>,
        commit: F,
    ) -> Result<usize>
    where
        F: FnOnce(usize, &[Track]),
    {
        let mut queue = self.tracks.lock();
        let len = queue.len();
        let index = before.unwrap_or(len);
        if index > len {
            return Err(PlaybackError::IndexOutOfBounds { index, len });
        }

        commit(index, &tracks);
        queue.splice(index..index, tracks);
        Ok(index)
    }

    /// Remove the slots at `indexes`.
    ///
    /// All indexes are validated before anything is removed. Duplicates are
    /// ignored and removal runs from the highest index down, calling
    /// `commit` once per removed slot. Returns the removed indexes in the
    /// order they were removed.
    pub fn remove_with<F>(&self, indexes: &[usize], mut commit: F) -> Result<Vec<usize>>
    where
        F: FnMut(usize),
    {
        let mut queue = self.tracks.lock();
        let len = queue.len();
        if let Some(&index) = indexes.iter().find(|&&index| index >= len) {
            return Err(PlaybackError::IndexOutOfBounds { index, len });
        }

        let mut ordered = indexes.to_vec();
        ordered.sort_unstable_by(|a, b| b.cmp(a));
        ordered.dedup();

        for &index in &ordered {
            queue.remove(index);
            commit(index);
        }
        Ok(ordered)
    }

    /// Remove every slot after `index`, last first. Returns how many were
    /// removed.
    pub fn truncate_after_with<F>(&self, index: usize, mut commit: F) -> usize
    where
        F: FnMut(usize),
    {
        let mut queue = self.tracks.lock();
        let keep = index.saturating_add(1);
        let mut removed = 0;
        while queue.len() > keep {
            let last = queue.len() - 1;
            queue.remove(last);
            commit(last);
            removed += 1;
        }
        removed
    }

    /// Replace the track at `index`.
    ///
    /// `current` runs under the lock and returns the slot being played, so
    /// no removal can shift the queue between the lookup and the write.
    /// Returns `true` when the replaced slot is the current one.
    pub fn replace_with<F>(&self, index: usize, track: Track, current: F) -> Result<bool>
    where
        F: FnOnce() -> Option<usize>,
    {
        let mut queue = self.tracks.lock();
        let len = queue.len();
        let slot = queue
            .get_mut(index)
            .ok_or(PlaybackError::IndexOutOfBounds { index, len })?;
        *slot = track;
        Ok(current() == Some(index))
    }

    /// Drop every track, running `commit` under the lock.
    pub fn clear_with<F>(&self, commit: F)
    where
        F: FnOnce(),
    {
        let mut queue = self.tracks.lock();
        commit();
        queue.clear();
    }
}
