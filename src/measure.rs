//! Rendered boxes: the measurement seam and a headless resolver.
//!
//! Gesture controllers need a space's live box (the browser's
//! `getBoundingClientRect`). Hosts provide it through [`ElementMeasure`].
//! [`ComputedLayout`] implements the same trait without a browser by
//! evaluating each space's CSS expressions against a viewport rectangle.
//!
//! The resolver follows the absolute-positioning rules the emitted CSS relies
//! on, per axis:
//!
//! ```text
//!   start + size   → x = start,             w = size
//!   start + end    → x = start,             w = parent - start - end
//!   end + size     → x = parent - end - w,  w = size
//!   start only     → x = start,             w = parent - start
//!   end only       → x = 0,                 w = parent - end
//!   size only      → x = 0,                 w = size
//!   nothing        → x = 0,                 w = parent
//! ```
//!
//! Percentages resolve against the parent's width for left/right/width and
//! against its height for top/bottom/height. Units other than `px` and `%`
//! count as zero.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::logging::warning;
use crate::size::SizeExpression;
use crate::space::{SpaceKey, SpaceType};
use crate::store::SpaceStore;
use crate::style::StyleSink;

/// A rendered box in viewport coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DomRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DomRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// `left + width`.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// `top + height`.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Reads the rendered box of a space.
///
/// Implementations backed by a real document look the element up by
/// `store.get(key)?.id()`; the store is passed so headless implementations
/// can compute the box themselves.
pub trait ElementMeasure {
    /// Box of `key`, or `None` if it is not rendered.
    fn bounding_rect<S: StyleSink>(&self, store: &SpaceStore<S>, key: SpaceKey) -> Option<DomRect>;
}

/// Headless [`ElementMeasure`] resolving CSS expressions against a viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComputedLayout {
    /// Box of the browser viewport, and of the container of top-level `Fixed` spaces.
    pub viewport: DomRect,
}

impl ComputedLayout {
    pub const fn new(viewport: DomRect) -> Self {
        Self { viewport }
    }

    /// Viewport at the origin with the given size.
    pub const fn with_size(width: f64, height: f64) -> Self {
        Self::new(DomRect::new(0.0, 0.0, width, height))
    }

    fn resolve<S: StyleSink>(&self, store: &SpaceStore<S>, key: SpaceKey) -> Option<DomRect> {
        let space = store.get(key)?;
        let container = match (space.space_type(), space.parent()) {
            (SpaceType::ViewPort, _) | (_, None) => self.viewport,
            (_, Some(parent)) => self.resolve(store, parent)?,
        };

        if space.space_type() == SpaceType::Fixed {
            let width = length(space.width(), container.width).unwrap_or(container.width);
            let height = length(space.height(), container.height).unwrap_or(container.height);
            return Some(DomRect::new(
                container.left,
                container.top,
                width.max(0.0),
                height.max(0.0),
            ));
        }

        let (x, w) = place_axis(
            length(space.left(), container.width),
            length(space.right(), container.width),
            length(space.width(), container.width),
            container.width,
        );
        let (y, h) = place_axis(
            length(space.top(), container.height),
            length(space.bottom(), container.height),
            length(space.height(), container.height),
            container.height,
        );
        Some(DomRect::new(container.left + x, container.top + y, w, h))
    }
}

impl ElementMeasure for ComputedLayout {
    fn bounding_rect<S: StyleSink>(&self, store: &SpaceStore<S>, key: SpaceKey) -> Option<DomRect> {
        self.resolve(store, key)
    }
}

fn length(expr: &SizeExpression, basis: f64) -> Option<f64> {
    let (value, lossy) = expr.resolve(basis)?;
    if lossy {
        warning!(expr = ?expr, "unresolvable CSS length treated as zero");
    }
    Some(value)
}

fn place_axis(start: Option<f64>, end: Option<f64>, size: Option<f64>, parent: f64) -> (f64, f64) {
    let (offset, extent) = match (start, end, size) {
        (Some(s), _, Some(w)) => (s, w),
        (Some(s), Some(e), None) => (s, parent - s - e),
        (None, Some(e), Some(w)) => (parent - e - w, w),
        (Some(s), None, None) => (s, parent - s),
        (None, Some(e), None) => (0.0, parent - e),
        (None, None, Some(w)) => (0.0, w),
        (None, None, None) => (0.0, parent),
    };
    (offset, extent.max(0.0))
}
