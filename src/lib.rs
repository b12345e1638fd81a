//! Anchored space layout: nested rectangular regions resolved to CSS rules.
//!
//! Regions ("spaces") are docked to an edge of their parent, fill what the
//! docked siblings leave, or sit at explicit coordinates. The engine computes
//! each region's edges as CSS `calc()` expressions and pushes one rule per
//! region into a [`StyleSink`]. Pointer gestures resize or move regions by
//! mutating a live delta and re-running the sibling recalculation, so the
//! host never remounts anything.
//!
//! No DOM, no threads, `no_std` + `alloc` compatible.
//!
//! # Modules
//!
//! - [`store`]: the space tree and sibling recalculation
//! - [`space`]: space types, props and definitions
//! - [`size`]: `calc()` size expressions
//! - [`style`]: CSS rule rendering and the sink trait
//! - [`resize`] / [`drag`]: pointer gesture sessions
//! - [`measure`]: box measurement seam plus a headless resolver
//! - [`center`]: content-centering rules
//! - [`config`]: store-wide defaults
//!
//! # Example
//!
//! ```
//! use spacelayout::{AnchorSide, SpaceProps, SpaceStore};
//!
//! let mut store = SpaceStore::new();
//! store.register(None, SpaceProps::viewport().id("app")).unwrap();
//! let header = SpaceProps::anchored(AnchorSide::Top, 60).id("header");
//! store.register(Some("app"), header).unwrap();
//! let nav = SpaceProps::anchored(AnchorSide::Left, "20%").id("nav");
//! store.register(Some("app"), nav).unwrap();
//! store.register(Some("app"), SpaceProps::fill().id("main")).unwrap();
//!
//! let rule = store.sink().rule("main").unwrap();
//! assert!(rule.contains("left: calc(0px + 20%); top: calc(0px + 60px);"));
//! assert!(rule.ends_with("right: 0px; bottom: 0px; z-index: 0; }"));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod logging;

pub mod center;
pub mod config;
pub mod drag;
pub mod error;
pub mod gesture;
pub mod measure;
pub mod resize;
pub mod size;
pub mod space;
pub mod store;
pub mod style;

pub use center::CenterType;
pub use config::SpacesConfig;
pub use drag::{DragEndPosition, DragOutcome, DragSession, start_drag};
pub use error::SpaceError;
pub use gesture::{PointerEvent, PointerInput};
pub use measure::{ComputedLayout, DomRect, ElementMeasure};
pub use resize::{ResizeOutcome, ResizeSession, start_resize};
pub use size::{SizeExpression, SizeUnit};
pub use space::{
    AnchorSide, CssPosition, GeometryField, HandlePlacement, Orientation, ResizeSide,
    SpaceCallbacks, SpaceDefinition, SpaceKey, SpaceProps, SpaceType,
};
pub use store::SpaceStore;
pub use style::{RecordingSheet, StyleSink, render_space, style_element_id};
