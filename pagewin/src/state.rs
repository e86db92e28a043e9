/// A lightweight, serializable snapshot of a window's bookkeeping.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowState {
    /// Logical index of the first materialized record.
    pub top_offset: usize,
    /// Number of materialized records (the placeholder is not counted).
    pub len: usize,
    /// Authoritative total, once known.
    pub total_count: Option<usize>,
    pub initialized: bool,
}

impl WindowState {
    /// One past the logical index of the last materialized record.
    pub fn bottom_offset(&self) -> usize {
        self.top_offset.saturating_add(self.len)
    }

    /// Whether more records may exist past the bottom of the window.
    pub fn has_more_below(&self) -> bool {
        match self.total_count {
            Some(total) => self.bottom_offset() < total,
            None => true,
        }
    }
}
