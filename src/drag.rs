//! Drag sessions: free-form repositioning of `Positioned` spaces.
//!
//! A drag writes the pointer offset into the `adjusted` list of the box's
//! start edges (`left`, `top`). When the box is stretched between both edges
//! of an axis the negated offset goes into the end edge too, so the box
//! translates instead of resizing. A box placed only by its end edge
//! (`right` + `width`) moves through that edge alone.

use alloc::vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SpaceError;
use crate::gesture::{PointerEvent, PointerInput, Throttle};
use crate::logging::{debug, warning};
use crate::measure::{DomRect, ElementMeasure};
use crate::size::{SizeExpression, SizeUnit};
use crate::space::{GeometryField, SpaceDefinition, SpaceKey, SpaceType};
use crate::store::SpaceStore;
use crate::style::StyleSink;

/// Box of a dragged space relative to its parent's box.
///
/// `right` and `bottom` are the coordinates of the far edges, not insets.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DragEndPosition {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl DragEndPosition {
    /// Express `rect` in the coordinate space of `parent`.
    pub fn relative_to(rect: DomRect, parent: DomRect) -> Self {
        Self {
            left: rect.left - parent.left,
            top: rect.top - parent.top,
            right: rect.right() - parent.left,
            bottom: rect.bottom() - parent.top,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Result of a finished drag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragOutcome {
    pub position: DragEndPosition,
    /// Whether any move event arrived between start and end.
    pub moved: bool,
}

/// Which edges of one axis a drag writes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct AxisTargets {
    start: Option<GeometryField>,
    end: Option<GeometryField>,
}

impl AxisTargets {
    fn of(space: &SpaceDefinition, start: GeometryField, end: GeometryField) -> Self {
        let has_start = space.expression(start).is_set();
        let has_end = space.expression(end).is_set();
        Self {
            start: (has_start || !has_end).then_some(start),
            end: has_end.then_some(end),
        }
    }

    /// Offset already applied by earlier drags.
    fn current(&self, space: &SpaceDefinition) -> f64 {
        match (self.start, self.end) {
            (Some(start), _) => first_px(space.expression(start)),
            (None, Some(end)) => -first_px(space.expression(end)),
            (None, None) => 0.0,
        }
    }

    fn apply(&self, space: &mut SpaceDefinition, delta: f64) -> bool {
        let mut changed = false;
        if let Some(start) = self.start {
            changed |= space
                .expression_mut(start)
                .set_adjusted(vec![SizeUnit::px(delta)]);
        }
        if let Some(end) = self.end {
            changed |= space
                .expression_mut(end)
                .set_adjusted(vec![SizeUnit::px(-delta)]);
        }
        changed
    }
}

fn first_px(expr: &SizeExpression) -> f64 {
    match expr.adjusted.first() {
        Some(SizeUnit::Px(v)) => *v,
        _ => 0.0,
    }
}

/// A running drag. Feed it moves, then [`finish`](Self::finish) it.
///
/// Dropping a session without finishing it leaves the space marked busy
/// until [`SpaceStore::abort_gesture`] is called.
#[must_use = "a dropped session keeps the space busy; call `finish`"]
pub struct DragSession {
    key: SpaceKey,
    input: PointerInput,
    /// Pointer position that corresponds to a zero offset.
    origin: (f64, f64),
    last: (f64, f64),
    moved: bool,
    throttle: Throttle,
    horizontal: AxisTargets,
    vertical: AxisTargets,
}

impl fmt::Debug for DragSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragSession")
            .field("key", &self.key)
            .field("input", &self.input)
            .field("origin", &self.origin)
            .field("moved", &self.moved)
            .finish_non_exhaustive()
    }
}

/// Begin dragging `key` from a pointer-down at `event`.
pub fn start_drag<S: StyleSink>(
    store: &mut SpaceStore<S>,
    key: SpaceKey,
    event: PointerEvent,
    input: PointerInput,
) -> Result<DragSession, SpaceError> {
    let throttle = Throttle::new(store.config().resize_throttle);
    let space = store.space_mut(key)?;
    if space.space_type != SpaceType::Positioned {
        return Err(SpaceError::NotPositioned {
            id: space.id.clone(),
        });
    }
    if space.has_gesture() {
        return Err(SpaceError::GestureInProgress {
            id: space.id.clone(),
        });
    }

    let horizontal = AxisTargets::of(space, GeometryField::Left, GeometryField::Right);
    let vertical = AxisTargets::of(space, GeometryField::Top, GeometryField::Bottom);
    let origin = (
        event.x - horizontal.current(space),
        event.y - vertical.current(space),
    );
    space.dragging = true;
    debug!(id = %space.id, "drag started");

    Ok(DragSession {
        key,
        input,
        origin,
        last: (event.x, event.y),
        moved: false,
        throttle,
        horizontal,
        vertical,
    })
}

impl DragSession {
    pub fn key(&self) -> SpaceKey {
        self.key
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
        let space = store.space_mut(self.key)?;
        let dx = self.last.0 - self.origin.0;
        let dy = self.last.1 - self.origin.1;
        let changed = self.horizontal.apply(space, dx) | self.vertical.apply(space, dy);
        if changed {
            store.update_styles(self.key)?;
        }
        Ok(())
    }

    /// Handle the end event: apply the last position unthrottled, clear the
    /// dragging flag, ask the parent to re-render and report the box relative
    /// to the parent's box.
    ///
    /// Returns `Ok(None)` when the box cannot be measured; `on_drag_end` is
    /// then skipped.
    pub fn finish<S: StyleSink, M: ElementMeasure>(
        self,
        store: &mut SpaceStore<S>,
        measure: &M,
    ) -> Result<Option<DragOutcome>, SpaceError> {
        if self.moved {
            self.apply(store)?;
        }
        let parent = {
            let space = store.space_mut(self.key)?;
            space.dragging = false;
            space.parent
        };
        if let Some(parent) = parent {
            store.notify_update(parent);
        }

        let Some(rect) = store.measure(self.key, measure) else {
            warning!(key = ?self.key, "dragged space could not be measured");
            return Ok(None);
        };
        let parent_rect = parent
            .and_then(|p| measure.bounding_rect(store, p))
            .unwrap_or_default();
        let outcome = DragOutcome {
            position: DragEndPosition::relative_to(rect, parent_rect),
            moved: self.moved,
        };
        debug!(key = ?self.key, moved = self.moved, "drag finished");

        if let Some(hook) = store.callbacks_mut(self.key)?.on_drag_end.as_mut() {
            hook(outcome.position, outcome.moved);
        }
        Ok(Some(outcome))
    }
}
