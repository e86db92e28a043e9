/// Sizing configuration for a [`crate::Window`].
///
/// `chunk_size` is the number of records requested per fetch and `max_window_size` bounds how
/// many records stay materialized. A full window must hold more than one chunk, otherwise
/// growing at one edge would immediately evict everything that was just loaded at the other.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize` so hosts can keep it
/// in their own configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowOptions {
    pub chunk_size: usize,
    pub max_window_size: usize,
    /// Records fetched before the anchor on init/reload, so a small backward scroll does not
    /// immediately need another fetch.
    pub look_behind: usize,
}

impl WindowOptions {
    /// Creates options with a look-behind margin of one third of a chunk.
    pub fn new(chunk_size: usize, max_window_size: usize) -> Self {
        Self {
            chunk_size,
            max_window_size,
            look_behind: chunk_size / 3,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_window_size(mut self, max_window_size: usize) -> Self {
        self.max_window_size = max_window_size;
        self
    }

    pub fn with_look_behind(mut self, look_behind: usize) -> Self {
        self.look_behind = look_behind;
        self
    }

    /// Returns `true` when `0 < chunk_size < max_window_size` and the look-behind margin fits in
    /// a chunk.
    pub fn is_valid(&self) -> bool {
        self.chunk_size > 0
            && self.chunk_size < self.max_window_size
            && self.look_behind <= self.chunk_size
    }

    /// Panics when [`Self::is_valid`] is `false`.
    #[track_caller]
    pub fn assert_valid(&self) {
        assert!(
            self.is_valid(),
            "invalid window options: chunk_size={} must be in 1..max_window_size={} and look_behind={} must not exceed it",
            self.chunk_size,
            self.max_window_size,
            self.look_behind
        );
    }
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self::new(30, 200)
    }
}
