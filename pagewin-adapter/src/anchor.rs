/// Where the viewport is, in window positions, so it can be put back after the window shifts.
///
/// Typical use: a `Prev` load prepends records above the first visible row; without restoring the
/// anchor, the list would jump by the number of prepended rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    /// First visible window position.
    pub position: usize,
    /// Pixel offset of that row's top edge relative to the viewport. Negative when the row is
    /// partially scrolled out at the top.
    pub offset_px: i32,
}

impl ScrollAnchor {
    pub fn new(position: usize, offset_px: i32) -> Self {
        Self {
            position,
            offset_px,
        }
    }

    pub fn capture(viewport: &impl Viewport) -> Self {
        Self::new(viewport.first_visible(), viewport.first_visible_offset())
    }

    /// Re-targets the anchor after the window's top offset moved by `top_shift`.
    ///
    /// The same logical record stays first visible when it is still materialized. Otherwise the
    /// anchor clamps to the first row (and to the end of `len` rows). A partially hidden first
    /// row cannot stay hidden once the window starts at logical index 0.
    pub fn shifted(self, top_shift: isize, top_offset: usize, len: usize) -> Self {
        let position = (self.position as isize - top_shift).max(0) as usize;
        let position = position.min(len.saturating_sub(1));
        let offset_px = if position == 0 && top_offset == 0 && self.offset_px < 0 {
            0
        } else {
            self.offset_px
        };
        Self::new(position, offset_px)
    }
}

/// The rendering side of a [`crate::WindowAdapter`], as far as scrolling is concerned.
///
/// All methods are called on the interaction thread.
pub trait Viewport {
    fn first_visible(&self) -> usize;

    /// See [`ScrollAnchor::offset_px`].
    fn first_visible_offset(&self) -> i32 {
        0
    }

    /// The materialized records changed; drop cached rows and re-query counts.
    fn data_changed(&mut self) {}

    fn scroll_to(&mut self, anchor: ScrollAnchor);
}

/// A viewport without a screen: tracks the anchor it was told about.
///
/// Useful for tests and for hosts that drive scrolling through their own model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeadlessViewport {
    pub anchor: ScrollAnchor,
    /// Number of `data_changed` notifications received.
    pub changes: usize,
}

impl HeadlessViewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: usize) -> Self {
        Self {
            anchor: ScrollAnchor::new(position, 0),
            changes: 0,
        }
    }
}

impl Viewport for HeadlessViewport {
    fn first_visible(&self) -> usize {
        self.anchor.position
    }

    fn first_visible_offset(&self) -> i32 {
        self.anchor.offset_px
    }

    fn data_changed(&mut self) {
        self.changes += 1;
    }

    fn scroll_to(&mut self, anchor: ScrollAnchor) {
        self.anchor = anchor;
    }
}
