/// Why a range of records is being loaded.
///
/// `Init` and `Reload` replace the whole window. `Next` and `Prev` extend it at the bottom and
/// top edge respectively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadKind {
    Init,
    Next,
    Prev,
    Reload,
}

impl LoadKind {
    /// Whether a result of this kind discards the existing window.
    pub fn replaces_window(self) -> bool {
        matches!(self, Self::Init | Self::Reload)
    }
}

/// How an incoming range was placed into the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    /// The window was discarded and rebuilt from the incoming records.
    Replace,
    /// Records were appended after the last materialized record.
    Append,
    /// Records were prepended before the first materialized record.
    Prepend,
    /// Records replaced a range fully inside the window; no resize happened.
    Overwrite,
    /// Nothing to place (empty edge result).
    Unchanged,
}

/// Generation tag carried by every fetch request and its result.
///
/// Generations are strictly increasing per adapter. A result is applied only if its token equals
/// the latest issued token; everything else is stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestToken {
    pub generation: u64,
}

impl RequestToken {
    pub fn new(generation: u64) -> Self {
        Self { generation }
    }

    /// Returns the token that follows this one.
    pub fn next(self) -> Self {
        Self {
            generation: self.generation.wrapping_add(1),
        }
    }
}

/// A materialized position as seen by a renderer.
#[derive(Debug, PartialEq, Eq)]
pub enum Entry<'a, T> {
    /// The window has not been loaded yet; render a "loading" row.
    Placeholder,
    Record(&'a T),
}

impl<'a, T> Entry<'a, T> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    pub fn record(&self) -> Option<&'a T> {
        match self {
            Self::Placeholder => None,
            Self::Record(r) => Some(r),
        }
    }
}

impl<T> Clone for Entry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Entry<'_, T> {}

/// A range the window wants loaded, before it is tagged with a [`RequestToken`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadRequest {
    pub kind: LoadKind,
    /// Logical index of the first requested record.
    pub from: usize,
    pub size: usize,
}

impl LoadRequest {
    pub fn new(kind: LoadKind, from: usize, size: usize) -> Self {
        Self { kind, from, size }
    }

    /// One past the last requested logical index.
    pub fn end(&self) -> usize {
        self.from.saturating_add(self.size)
    }
}
