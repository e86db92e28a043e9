use core::ops::Range;

use crate::{LoadKind, Placement};

/// The outcome of placing `incoming` records into a window, computed without touching any
/// records.
///
/// All amounts are derived from a single combined length (`resident + taken incoming`), so
/// growth at one edge and the overflow shrink at the other edge never see different lengths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub placement: Placement,
    /// Indexes into the incoming records that enter the window. Incoming records outside this
    /// range are discarded.
    pub take: Range<usize>,
    /// Resident records removed from the top edge (all residents for [`Placement::Replace`]).
    pub evict_top: usize,
    /// Resident records removed from the bottom edge.
    pub evict_bottom: usize,
    /// Position of the first overwritten resident, for [`Placement::Overwrite`].
    pub overwrite_at: usize,
    pub new_top: usize,
    pub new_len: usize,
}

impl Plan {
    fn unchanged(top: usize, len: usize) -> Self {
        Self {
            placement: Placement::Unchanged,
            take: 0..0,
            evict_top: 0,
            evict_bottom: 0,
            overwrite_at: 0,
            new_top: top,
            new_len: len,
        }
    }

    /// Number of resident records that leave the window.
    pub fn evicted(&self) -> usize {
        match self.placement {
            Placement::Overwrite => self.take.len(),
            _ => self.evict_top + self.evict_bottom,
        }
    }

    /// Signed change of the top offset.
    pub fn top_shift(&self, top: usize) -> isize {
        self.new_top as isize - top as isize
    }
}

/// Computes how `incoming` records starting at logical index `from` fit into a window that
/// currently holds `len` records starting at `top`.
///
/// Returns `None` when the range is neither a replacement, contiguous with the edge its `kind`
/// loads (`Next` below, `Prev` above), nor fully inside the window.
pub fn plan(
    top: usize,
    len: usize,
    kind: LoadKind,
    from: usize,
    incoming: usize,
    max_window_size: usize,
) -> Option<Plan> {
    if kind.replaces_window() {
        let keep = incoming.min(max_window_size);
        return Some(Plan {
            placement: Placement::Replace,
            take: 0..keep,
            evict_top: len,
            evict_bottom: 0,
            overwrite_at: 0,
            new_top: from,
            new_len: keep,
        });
    }

    if incoming == 0 {
        return Some(Plan::unchanged(top, len));
    }

    let bottom = top.checked_add(len)?;
    let end = from.checked_add(incoming)?;

    if from == bottom && kind == LoadKind::Next {
        // Slide forward: grow at the bottom, then shed the overflow from the top.
        let combined = len + incoming;
        let overflow = combined.saturating_sub(max_window_size);
        let evict_top = overflow.min(len);
        let skip = overflow - evict_top;
        return Some(Plan {
            placement: Placement::Append,
            take: skip..incoming,
            evict_top,
            evict_bottom: 0,
            overwrite_at: 0,
            new_top: top + overflow,
            new_len: combined - overflow,
        });
    }

    if from >= top && end <= bottom {
        return Some(Plan {
            placement: Placement::Overwrite,
            take: 0..incoming,
            evict_top: 0,
            evict_bottom: 0,
            overwrite_at: from - top,
            new_top: top,
            new_len: len,
        });
    }

    if from < top && end >= top && kind == LoadKind::Prev {
        // Slide backward. Growth can never pass logical index 0 because `from` is unsigned;
        // records at or past `top` duplicate residents and are dropped.
        let grow = top - from;
        let combined = len + grow;
        let overflow = combined.saturating_sub(max_window_size);
        let evict_bottom = overflow.min(len);
        let cut = overflow - evict_bottom;
        return Some(Plan {
            placement: Placement::Prepend,
            take: 0..grow - cut,
            evict_top: 0,
            evict_bottom,
            overwrite_at: 0,
            new_top: from,
            new_len: combined - overflow,
        });
    }

    None
}
