//! Error type shared by the store and the gesture controllers.
//!
//! Every variant is a programmer error in the layer that drives the engine
//! (a wrapper registering inconsistent props, or a host starting a gesture the
//! space cannot perform). Nothing here is retried; the next triggering event
//! simply calls back into the store.

use alloc::string::String;

use crate::space::{ResizeSide, SpaceKey};

/// Errors raised by [`SpaceStore`](crate::SpaceStore) and the gesture controllers.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpaceError {
    /// An `Anchored` space was described without an anchor side.
    #[error("space `{id}` is anchored but has no anchor side")]
    MissingAnchor { id: String },

    /// A space that is not a top-level container was registered without a parent.
    #[error("space `{id}` must be placed inside a top-level ViewPort or Fixed space")]
    MissingAncestor { id: String },

    /// The parent id given at registration is not known to the store.
    #[error("space `{id}` names unknown parent `{parent}`")]
    UnknownParent { id: String, parent: String },

    /// Another live space already uses this id.
    #[error("a space with id `{id}` is already registered")]
    DuplicateId { id: String },

    /// The key does not refer to a live space.
    #[error("no live space under {key:?}")]
    UnknownSpace { key: SpaceKey },

    /// The space has no resize handle on the requested side.
    #[error("space `{id}` cannot be resized from {side:?}")]
    InvalidResizeSide { id: String, side: ResizeSide },

    /// Free-form dragging is only defined for `Positioned` spaces.
    #[error("space `{id}` is not positioned and cannot be dragged")]
    NotPositioned { id: String },

    /// A resize or drag session is already running on this space.
    #[error("space `{id}` already has an active resize or drag session")]
    GestureInProgress { id: String },

    /// The host could not report a rendered box for the space.
    #[error("space `{id}` has no rendered box to measure")]
    NotMeasured { id: String },
}
