//! Engine-wide defaults.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use spacelayout::{HandlePlacement, SpacesConfig};
//!
//! let config = SpacesConfig::default()
//!     .handle_size(8.0)
//!     .handle_placement(HandlePlacement::OverlayBoundary)
//!     .resize_throttle(Duration::from_millis(16));
//!
//! assert_eq!(config.effective_handle_size(), 8.0);
//! ```

use alloc::string::String;
use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::space::HandlePlacement;

/// Defaults applied to every space a [`SpaceStore`](crate::SpaceStore) creates.
///
/// Per-space props override `handle_size` and `handle_placement`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpacesConfig {
    /// Thickness of a resize strip in pixels (default 5).
    pub handle_size: f64,
    /// Thickness of a resize strip when touch input is enabled (default 5).
    pub touch_handle_size: f64,
    /// Use `touch_handle_size` instead of `handle_size`.
    pub touch_enabled: bool,
    /// Where resize strips sit relative to the space's edge.
    pub handle_placement: HandlePlacement,
    /// Resize floor for non-positioned spaces without an explicit minimum (default 20).
    pub default_minimum_size: f64,
    /// Minimum spacing between applied pointer-move ticks (default 10 ms).
    pub resize_throttle: Duration,
    /// Prefix for generated ids (default `"s"`, giving `s1`, `s2`, ...).
    pub id_prefix: String,
}

impl Default for SpacesConfig {
    fn default() -> Self {
        Self {
            handle_size: 5.0,
            touch_handle_size: 5.0,
            touch_enabled: false,
            handle_placement: HandlePlacement::OverlayInside,
            default_minimum_size: 20.0,
            resize_throttle: Duration::from_millis(10),
            id_prefix: String::from("s"),
        }
    }
}

impl SpacesConfig {
    /// Set the mouse resize strip thickness.
    pub fn handle_size(mut self, size: f64) -> Self {
        self.handle_size = size;
        self
    }

    /// Set the touch resize strip thickness.
    pub fn touch_handle_size(mut self, size: f64) -> Self {
        self.touch_handle_size = size;
        self
    }

    /// Size strips for touch input.
    pub fn touch_enabled(mut self, enabled: bool) -> Self {
        self.touch_enabled = enabled;
        self
    }

    /// Set the default strip placement.
    pub fn handle_placement(mut self, placement: HandlePlacement) -> Self {
        self.handle_placement = placement;
        self
    }

    /// Set the implicit resize floor.
    pub fn default_minimum_size(mut self, size: f64) -> Self {
        self.default_minimum_size = size;
        self
    }

    /// Set the pointer-move throttle window. `Duration::ZERO` applies every move.
    pub fn resize_throttle(mut self, window: Duration) -> Self {
        self.resize_throttle = window;
        self
    }

    /// Set the prefix for generated ids.
    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Strip thickness for spaces that do not override it.
    pub fn effective_handle_size(&self) -> f64 {
        if self.touch_enabled {
            self.touch_handle_size
        } else {
            self.handle_size
        }
    }
}
