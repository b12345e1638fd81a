//! Resize sessions: pointer-driven changes to a space's `resized` deltas.
//!
//! A session starts on pointer-down over a resize strip and lives until the
//! pointer is released. The box is measured once at the start; the allowed
//! range is kept as deltas relative to that box, so existing `adjusted` and
//! `resized` contributions never need to be known.
//!
//! How a handle edge maps onto geometry:
//!
//! ```text
//!   Anchored, far edge        → anchor dimension (width/height), grows with the drag
//!   Positioned, start edge    → left/top moves with the pointer, width/height mirrors it
//!   Positioned, end edge      → right/bottom moves, width/height mirrors it;
//!                               without right/bottom, width/height grows directly
//! ```
//!
//! Anchored and custom spaces are clamped to `[minimum, maximum]`, falling back
//! to the configured default minimum. Positioned spaces are clamped only by
//! explicit limits.
//!
//! # Example
//!
//! ```
//! use spacelayout::{
//!     AnchorSide, ComputedLayout, PointerEvent, PointerInput, ResizeSide, SpaceProps,
//!     SpaceStore, SpacesConfig, start_resize,
//! };
//! use core::time::Duration;
//!
//! let config = SpacesConfig::default().resize_throttle(Duration::ZERO);
//! let mut store = SpaceStore::with_config(config);
//! store.register(None, SpaceProps::viewport().id("app")).unwrap();
//! let props = SpaceProps::anchored(AnchorSide::Left, 100).resizable(true);
//! let side = store.register(Some("app"), props).unwrap();
//!
//! let view = ComputedLayout::with_size(800.0, 600.0);
//! let down = PointerEvent::at(100.0, 10.0);
//! let mut session = start_resize(
//!     &mut store,
//!     side,
//!     ResizeSide::Right,
//!     down,
//!     PointerInput::Mouse,
//!     &view,
//! )
//! .unwrap()
//! .expect("not cancelled");
//! session.pointer_move(&mut store, PointerEvent::at(140.0, 10.0)).unwrap();
//! let end = session.finish(&mut store, &view).unwrap().unwrap();
//!
//! assert_eq!(end.size, 140);
//! assert_eq!(store.space(side).unwrap().width().css().as_deref(), Some("calc(100px + 40px)"));
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use num_traits::Float;

use crate::error::SpaceError;
use crate::gesture::{PointerEvent, PointerInput, Throttle};
use crate::logging::{debug, warning};
use crate::measure::{DomRect, ElementMeasure};
use crate::space::{
    AnchorSide, GeometryField, Orientation, ResizeSide, SpaceDefinition, SpaceKey, SpaceType,
};
use crate::store::SpaceStore;
use crate::style::StyleSink;

/// Result of a finished resize.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResizeOutcome {
    /// Final size along the handle's axis (width for corners), floored.
    pub size: u32,
    /// Box measured after the last tick.
    pub rect: DomRect,
    pub side: ResizeSide,
}

/// One edge moved by a session.
#[derive(Copy, Clone, Debug, PartialEq)]
struct EdgeAdjuster {
    edge: AnchorSide,
    /// Field whose `resized` takes the delta.
    target: GeometryField,
    /// +1 when the target grows with the handle, -1 when it is an offset moving against it.
    sign: f64,
    /// Dimension that absorbs the inverse of an offset change.
    mirror: Option<GeometryField>,
    target_start: f64,
    mirror_start: f64,
    min_delta: f64,
    max_delta: f64,
}

impl EdgeAdjuster {
    /// Growth of the box along this edge for a pointer at `(x, y)`.
    fn growth(&self, origin: (f64, f64), x: f64, y: f64) -> f64 {
        let raw = match self.edge {
            AnchorSide::Left => origin.0 - x,
            AnchorSide::Right => x - origin.0,
            AnchorSide::Top => origin.1 - y,
            AnchorSide::Bottom => y - origin.1,
        };
        raw.max(self.min_delta).min(self.max_delta)
    }
}

type EndCallback = Box<dyn FnOnce(ResizeOutcome)>;

/// A running resize. Feed it moves, then [`finish`](Self::finish) it.
///
/// Dropping a session without finishing it leaves the space marked busy
/// until [`SpaceStore::abort_gesture`] is called.
#[must_use = "a dropped session keeps the space busy; call `finish`"]
pub struct ResizeSession {
    key: SpaceKey,
    side: ResizeSide,
    input: PointerInput,
    origin: (f64, f64),
    last: (f64, f64),
    moved: bool,
    throttle: Throttle,
    adjusters: Vec<EdgeAdjuster>,
    on_end: Option<EndCallback>,
}

impl fmt::Debug for ResizeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeSession")
            .field("key", &self.key)
            .field("side", &self.side)
            .field("input", &self.input)
            .field("origin", &self.origin)
            .field("moved", &self.moved)
            .finish_non_exhaustive()
    }
}

/// Begin resizing `key` from handle `side`.
///
/// Runs the space's `on_resize_start` hook first; `Ok(None)` means the hook
/// returned `false` and nothing was started.
pub fn start_resize<S: StyleSink, M: ElementMeasure>(
    store: &mut SpaceStore<S>,
    key: SpaceKey,
    side: ResizeSide,
    event: PointerEvent,
    input: PointerInput,
    measure: &M,
) -> Result<Option<ResizeSession>, SpaceError> {
    let default_minimum = store.config().default_minimum_size;
    let throttle = Throttle::new(store.config().resize_throttle);

    let targets = {
        let space = store.space(key)?;
        if space.has_gesture() {
            return Err(SpaceError::GestureInProgress {
                id: space.id.clone(),
            });
        }
        side.edges()
            .iter()
            .map(|&edge| edge_target(space, side, edge))
            .collect::<Result<Vec<_>, _>>()?
    };

    let allowed = match store.callbacks_mut(key)?.on_resize_start.as_mut() {
        Some(hook) => hook(),
        None => true,
    };
    if !allowed {
        debug!(key = ?key, side = ?side, "resize cancelled by on_resize_start");
        return Ok(None);
    }

    let rect = store
        .measure(key, measure)
        .ok_or_else(|| SpaceError::NotMeasured {
            id: store.get(key).map(|s| s.id.clone()).unwrap_or_default(),
        })?;

    let space = store.space_mut(key)?;
    let clamped = space.space_type != SpaceType::Positioned;
    let minimum = space
        .minimum_size
        .or(if clamped { Some(default_minimum) } else { None });
    let maximum = space.maximum_size;

    let adjusters = targets
        .into_iter()
        .map(|(edge, target, sign, mirror)| {
            let current = match edge.orientation() {
                Orientation::Horizontal => rect.width,
                Orientation::Vertical => rect.height,
            };
            EdgeAdjuster {
                edge,
                target,
                sign,
                mirror,
                target_start: space.expression(target).resized,
                mirror_start: mirror.map_or(0.0, |m| space.expression(m).resized),
                min_delta: minimum.map_or(f64::NEG_INFINITY, |m| m - current),
                max_delta: maximum.map_or(f64::INFINITY, |m| m - current),
            }
        })
        .collect();

    space.resizing = true;
    debug!(id = %space.id, side = ?side, "resize started");
    Ok(Some(ResizeSession {
        key,
        side,
        input,
        origin: (event.x, event.y),
        last: (event.x, event.y),
        moved: false,
        throttle,
        adjusters,
        on_end: None,
    }))
}

/// Pick the geometry field an edge handle writes to.
fn edge_target(
    space: &SpaceDefinition,
    side: ResizeSide,
    edge: AnchorSide,
) -> Result<(AnchorSide, GeometryField, f64, Option<GeometryField>), SpaceError> {
    let invalid = || SpaceError::InvalidResizeSide {
        id: space.id.clone(),
        side,
    };
    if !space.can_resize(edge) {
        return Err(invalid());
    }
    let dimension = edge.dimension_field();
    match space.space_type {
        SpaceType::Anchored => match space.anchor {
            Some(anchor) if anchor.opposite() == edge => Ok((edge, dimension, 1.0, None)),
            _ => Err(invalid()),
        },
        SpaceType::Positioned | SpaceType::Custom => {
            let offset = edge.edge_field();
            let has_dimension = space.expression(dimension).is_set();
            if space.expression(offset).is_set() {
                Ok((edge, offset, -1.0, has_dimension.then_some(dimension)))
            } else if has_dimension {
                Ok((edge, dimension, 1.0, None))
            } else {
                Err(invalid())
            }
        }
        _ => Err(invalid()),
    }
}

impl ResizeSession {
    /// Call `callback` at the end instead of the space's `on_resize_end` hook.
    pub fn on_end(mut self, callback: impl FnOnce(ResizeOutcome) + 'static) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }

    pub fn key(&self) -> SpaceKey {
        self.key
    }

    pub fn side(&self) -> ResizeSide {
        self.side
    }

    /// Input whose move/end events the host listens on.
    pub fn input(&self) -> PointerInput {
        self.input
    }

    /// Handle a move event. Returns whether it was applied or throttled away.
    pub fn pointer_move<S: StyleSink>(
        &mut self,
        store: &mut SpaceStore<S>,
        event: PointerEvent,
    ) -> Result<bool, SpaceError> {
        self.moved = true;
        self.last = (event.x, event.y);
        if !self.throttle.admit(event.timestamp) {
            return Ok(false);
        }
        self.apply(store)?;
        Ok(true)
    }

    fn apply<S: StyleSink>(&self, store: &mut SpaceStore<S>) -> Result<(), SpaceError> {
        let (x, y) = self.last;
        let space = store.space_mut(self.key)?;
        let mut changed = false;
        for adjuster in &self.adjusters {
            let growth = adjuster.growth(self.origin, x, y);
            let target = space.expression_mut(adjuster.target);
            let resized = adjuster.target_start + adjuster.sign * growth;
            if target.resized != resized {
                target.resized = resized;
                changed = true;
            }
            if let Some(mirror) = adjuster.mirror {
                space.expression_mut(mirror).resized = adjuster.mirror_start + growth;
            }
        }
        if changed {
            store.update_styles(self.key)?;
        }
        Ok(())
    }

    /// Handle the end event: apply the last position unthrottled, clear the
    /// resizing flag, ask the parent to re-render and report the final box.
    ///
    /// Returns `Ok(None)` when the box cannot be measured; the end hook is
    /// then skipped.
    pub fn finish<S: StyleSink, M: ElementMeasure>(
        self,
        store: &mut SpaceStore<S>,
        measure: &M,
    ) -> Result<Option<ResizeOutcome>, SpaceError> {
        if self.moved {
            self.apply(store)?;
        }
        let parent = {
            let space = store.space_mut(self.key)?;
            space.resizing = false;
            space.parent
        };
        if let Some(parent) = parent {
            store.notify_update(parent);
        }

        let Some(rect) = store.measure(self.key, measure) else {
            warning!(key = ?self.key, "resized space could not be measured");
            return Ok(None);
        };
        let extent = if self.side.is_horizontal() {
            rect.width
        } else {
            rect.height
        };
        let outcome = ResizeOutcome {
            size: Float::floor(extent).max(0.0) as u32,
            rect,
            side: self.side,
        };
        debug!(key = ?self.key, size = outcome.size, side = ?self.side, "resize finished");

        match self.on_end {
            Some(callback) => callback(outcome),
            None => {
                if let Some(hook) = store.callbacks_mut(self.key)?.on_resize_end.as_mut() {
                    hook(outcome.size, outcome.rect, outcome.side);
                }
            }
        }
        Ok(Some(outcome))
    }

    /// Abandon the session, restoring the deltas it started from.
    pub fn cancel<S: StyleSink>(self, store: &mut SpaceStore<S>) -> Result<(), SpaceError> {
        let space = store.space_mut(self.key)?;
        for adjuster in &self.adjusters {
            space.expression_mut(adjuster.target).resized = adjuster.target_start;
            if let Some(mirror) = adjuster.mirror {
                space.expression_mut(mirror).resized = adjuster.mirror_start;
            }
        }
        space.resizing = false;
        store.update_styles(self.key)
    }
}
