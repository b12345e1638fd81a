//! Centering wrappers for a space's content.
//!
//! Stateless: a space only records which mode it wants, and the store renders
//! the matching companion rule `#<id>-centered` next to its main rule. The
//! wrapper layer puts an element with that id (and [`CenterType::class_name`])
//! around the space's children.

use alloc::format;
use alloc::string::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a space centers its content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CenterType {
    /// Content flows normally.
    #[default]
    None,
    /// Centered on the vertical axis only.
    Vertical,
    /// Centered on both axes.
    HorizontalVertical,
}

impl CenterType {
    /// Class name conventionally given to the wrapper element.
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Vertical => Some("spaces-centered-vertically"),
            Self::HorizontalVertical => Some("spaces-centered"),
        }
    }

    /// CSS declarations for the wrapper element.
    pub fn declarations(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Vertical => Some(
                "display: flex; flex-direction: column; justify-content: center; height: 100%;",
            ),
            Self::HorizontalVertical => Some(
                "display: flex; flex-direction: column; justify-content: center; \
                 align-items: center; text-align: center; height: 100%;",
            ),
        }
    }
}

/// Companion rule for the centering wrapper of space `id`.
pub fn centered_rule(id: &str, center: CenterType) -> Option<String> {
    center
        .declarations()
        .map(|decls| format!("#{id}-centered {{ {decls} }}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rule_when_not_centered() {
        assert_eq!(centered_rule("a", CenterType::None), None);
        assert_eq!(CenterType::None.class_name(), None);
    }

    #[test]
    fn vertical_only_leaves_horizontal_alone() {
        let rule = centered_rule("a", CenterType::Vertical).unwrap();
        assert!(rule.starts_with("#a-centered { display: flex;"));
        assert!(rule.contains("justify-content: center;"));
        assert!(!rule.contains("align-items"));
    }

    #[test]
    fn both_axes_adds_cross_axis_alignment() {
        let rule = centered_rule("hero", CenterType::HorizontalVertical).unwrap();
        assert!(rule.contains("align-items: center;"));
        assert!(rule.ends_with("height: 100%; }"));
    }
}
