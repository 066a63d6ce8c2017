use super::result::AnalysisResult;

/// In-memory list of past results, newest first. Lives for one app session.
#[derive(Clone, Debug)]
pub struct SessionHistory<T = AnalysisResult> {
    entries: Vec<T>,
}

impl<T> SessionHistory<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add `entry` at the head of the history.
    pub fn record(&mut self, entry: T) {
        self.entries.insert(0, entry);
    }

    /// Remove the entry at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T> Default for SessionHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}
