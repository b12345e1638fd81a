//! Size expressions: one edge or dimension of a space as CSS `calc()` parts.
//!
//! A [`SizeExpression`] keeps three contributions apart:
//!
//! - `size`: the base length the wrapper asked for,
//! - `adjusted`: other spaces' sizes this edge must clear (owned by the store),
//! - `resized`: the live pixel delta written by resize and drag sessions.
//!
//! Keeping them apart lets a resize touch a single number without rebuilding
//! any sibling's base size.
//!
//! # Example
//!
//! ```
//! use spacelayout::{SizeExpression, SizeUnit};
//!
//! let mut left = SizeExpression::new(0);
//! assert_eq!(left.css().as_deref(), Some("0px"));
//!
//! left.adjusted = vec![SizeUnit::px(50.0), SizeUnit::percent(10.0)];
//! assert_eq!(left.css().as_deref(), Some("calc(0px + 50px + 10%)"));
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single length term.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SizeUnit {
    /// Absolute pixels.
    Px(f64),
    /// Any CSS length passed through verbatim, usually a percentage (`"20%"`).
    Css(String),
}

impl SizeUnit {
    /// Absolute pixel length.
    pub const fn px(value: f64) -> Self {
        Self::Px(value)
    }

    /// Percentage of the containing block, rendered as `"<n>%"`.
    pub fn percent(value: f64) -> Self {
        Self::Css(format!("{}%", format_number(value)))
    }

    /// Whether this is the literal pixel zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Px(v) if *v == 0.0)
    }

    /// Render one `calc()` operand.
    pub fn to_css(&self) -> String {
        match self {
            Self::Px(v) => format_px(*v),
            Self::Css(s) => s.clone(),
        }
    }

    /// Resolve to pixels against `basis`, the containing block's length on
    /// this term's axis. Supports `px` and `%`; anything else is `None`.
    pub fn resolve(&self, basis: f64) -> Option<f64> {
        match self {
            Self::Px(v) => Some(*v),
            Self::Css(s) => {
                let s = s.trim();
                if let Some(pct) = s.strip_suffix('%') {
                    pct.trim().parse::<f64>().ok().map(|p| basis * p / 100.0)
                } else if let Some(px) = s.strip_suffix("px") {
                    px.trim().parse::<f64>().ok()
                } else {
                    s.parse::<f64>().ok()
                }
            }
        }
    }
}

impl From<f64> for SizeUnit {
    fn from(value: f64) -> Self {
        Self::Px(value)
    }
}

impl From<i32> for SizeUnit {
    fn from(value: i32) -> Self {
        Self::Px(value as f64)
    }
}

impl From<&str> for SizeUnit {
    fn from(value: &str) -> Self {
        Self::Css(value.into())
    }
}

impl From<String> for SizeUnit {
    fn from(value: String) -> Self {
        Self::Css(value)
    }
}

/// One edge or dimension of a space.
///
/// An expression with no `size`, no `adjusted` terms and no `resized` delta is
/// unset: it renders to `None` and no CSS property is emitted for it.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizeExpression {
    /// Requested base length. `None` leaves the edge to the browser.
    pub size: Option<SizeUnit>,
    /// Sizes of other spaces this edge must offset past, in stacking order.
    pub adjusted: Vec<SizeUnit>,
    /// Pixel delta from user resize, kept apart from `size`.
    pub resized: f64,
}

impl SizeExpression {
    /// Expression with a base size and nothing else.
    pub fn new(size: impl Into<SizeUnit>) -> Self {
        Self {
            size: Some(size.into()),
            adjusted: Vec::new(),
            resized: 0.0,
        }
    }

    /// Expression from an optional base size.
    pub fn from_size(size: Option<SizeUnit>) -> Self {
        Self {
            size,
            adjusted: Vec::new(),
            resized: 0.0,
        }
    }

    /// Unconstrained expression.
    pub fn unset() -> Self {
        Self::default()
    }

    /// Whether a base size was requested.
    pub fn is_set(&self) -> bool {
        self.size.is_some()
    }

    /// All non-empty terms in render order: size, adjustments, resize delta.
    pub fn parts(&self) -> Vec<SizeUnit> {
        let mut parts = Vec::with_capacity(self.adjusted.len() + 2);
        if let Some(size) = &self.size {
            parts.push(size.clone());
        }
        parts.extend(self.adjusted.iter().cloned());
        if self.resized != 0.0 {
            parts.push(SizeUnit::Px(self.resized));
        }
        parts
    }

    /// Render as a CSS length.
    ///
    /// - exact zero with nothing else: `"0px"`
    /// - no parts: `None`
    /// - one part: that literal
    /// - otherwise `calc(a + b + ...)`
    pub fn css(&self) -> Option<String> {
        if self.size.as_ref().is_some_and(SizeUnit::is_zero)
            && self.adjusted.is_empty()
            && self.resized == 0.0
        {
            return Some(String::from("0px"));
        }

        let parts = self.parts();
        match parts.as_slice() {
            [] => None,
            [single] => Some(single.to_css()),
            _ => {
                let joined: Vec<String> = parts.iter().map(SizeUnit::to_css).collect();
                Some(format!("calc({})", joined.join(" + ")))
            }
        }
    }

    /// Resolve the whole expression to pixels against `basis`.
    ///
    /// Returns `None` when the expression is unset. Terms that cannot be
    /// resolved count as zero and are reported through the second value.
    pub fn resolve(&self, basis: f64) -> Option<(f64, bool)> {
        let parts = self.parts();
        if parts.is_empty() {
            return None;
        }
        let mut total = 0.0;
        let mut lossy = false;
        for part in &parts {
            match part.resolve(basis) {
                Some(v) => total += v,
                None => lossy = true,
            }
        }
        Some((total, lossy))
    }

    /// Replace the adjustment list, reporting whether anything changed.
    pub(crate) fn set_adjusted(&mut self, adjusted: Vec<SizeUnit>) -> bool {
        if self.adjusted == adjusted {
            return false;
        }
        self.adjusted = adjusted;
        true
    }
}

/// Format a pixel length, folding `-0` into `0px`.
pub(crate) fn format_px(value: f64) -> String {
    format!("{}px", format_number(value))
}

pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        String::from("0")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    // ── Rendering ───────────────────────────────────────────────────────

    #[test]
    fn zero_collapses_to_zero_px() {
        let e = SizeExpression::new(0);
        assert_eq!(e.css().as_deref(), Some("0px"));
    }

    #[test]
    fn unset_renders_nothing() {
        assert_eq!(SizeExpression::unset().css(), None);
    }

    #[test]
    fn single_literal_is_not_wrapped() {
        assert_eq!(SizeExpression::new(40).css().as_deref(), Some("40px"));
        assert_eq!(SizeExpression::new("20%").css().as_deref(), Some("20%"));
    }

    #[test]
    fn adjusted_only_renders_its_single_term() {
        let e = SizeExpression {
            size: None,
            adjusted: vec![SizeUnit::px(30.0)],
            resized: 0.0,
        };
        assert_eq!(e.css().as_deref(), Some("30px"));
    }

    #[test]
    fn multiple_parts_join_in_calc() {
        let e = SizeExpression {
            size: Some(SizeUnit::px(50.0)),
            adjusted: vec![],
            resized: 100.0,
        };
        assert_eq!(e.css().as_deref(), Some("calc(50px + 100px)"));
    }

    #[test]
    fn negative_resize_is_kept_as_its_own_term() {
        let e = SizeExpression {
            size: Some(SizeUnit::percent(25.0)),
            adjusted: vec![],
            resized: -12.5,
        };
        assert_eq!(e.css().as_deref(), Some("calc(25% + -12.5px)"));
    }

    #[test]
    fn zero_size_with_resize_is_not_collapsed() {
        let e = SizeExpression {
            size: Some(SizeUnit::px(0.0)),
            adjusted: vec![],
            resized: 8.0,
        };
        assert_eq!(e.css().as_deref(), Some("calc(0px + 8px)"));
    }

    #[test]
    fn negative_zero_formats_as_zero() {
        assert_eq!(format_px(-0.0), "0px");
        assert_eq!(SizeUnit::percent(33.5).to_css(), "33.5%");
    }

    // ── Resolution ──────────────────────────────────────────────────────

    #[test]
    fn resolve_mixes_px_and_percent() {
        let e = SizeExpression {
            size: Some(SizeUnit::px(10.0)),
            adjusted: vec![SizeUnit::percent(50.0), SizeUnit::from("4px")],
            resized: 6.0,
        };
        assert_eq!(e.resolve(200.0), Some((120.0, false)));
    }

    #[test]
    fn resolve_flags_unknown_units() {
        let e = SizeExpression::new("10vh");
        assert_eq!(e.resolve(100.0), Some((0.0, true)));
        assert_eq!(SizeExpression::unset().resolve(100.0), None);
    }

    #[test]
    fn set_adjusted_reports_changes_only() {
        let mut e = SizeExpression::new(0);
        assert!(e.set_adjusted(vec![SizeUnit::px(5.0)]));
        assert!(!e.set_adjusted(vec![SizeUnit::px(5.0)]));
        assert!(e.set_adjusted(vec![]));
    }
}
