//! CSS output: one style element per space.
//!
//! Each space owns the element `style_<id>`. Its text is the main rule
//!
//! ```text
//! #<id> { position: ...; left: ...; top: ...; right: ...; bottom: ...;
//!         width: ...; height: ...; z-index: <n>; overflow: auto; }
//! ```
//!
//! (unset geometry is omitted, `overflow` only for scrollable spaces), followed
//! by one strip rule per resizable edge (`#<id>-ml`, `-mt`, `-mr`, `-mb`) and
//! the centering rule when the space centers its content.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::center::centered_rule;
use crate::logging::trace;
use crate::size::format_px;
use crate::space::{AnchorSide, GeometryField, HandlePlacement, Orientation, SpaceDefinition};

/// Destination for rendered rules, usually the document head.
pub trait StyleSink {
    /// Create or replace the style element for space `id`.
    fn write_rule(&mut self, id: &str, css: &str);
    /// Drop the style element for space `id`.
    fn remove_rule(&mut self, id: &str);
}

/// Id of the style element holding the rules of space `id`.
pub fn style_element_id(id: &str) -> String {
    format!("style_{id}")
}

/// In-memory [`StyleSink`] that also counts writes.
///
/// Serves as the sink for server-side rendering (collect every rule, then
/// emit them with [`RecordingSheet::to_css`]) and for tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingSheet {
    rules: BTreeMap<String, String>,
    writes: usize,
    removals: usize,
}

impl RecordingSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of the style element for space `id`.
    pub fn rule(&self, id: &str) -> Option<&str> {
        self.rules.get(&style_element_id(id)).map(String::as_str)
    }

    /// Style element ids currently present, sorted.
    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total number of `write_rule` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Total number of `remove_rule` calls so far.
    pub fn removals(&self) -> usize {
        self.removals
    }

    /// Every rule, one per line, ordered by element id.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for css in self.rules.values() {
            out.push_str(css);
            out.push('\n');
        }
        out
    }
}

impl StyleSink for RecordingSheet {
    fn write_rule(&mut self, id: &str, css: &str) {
        self.writes += 1;
        self.rules.insert(style_element_id(id), css.into());
    }

    fn remove_rule(&mut self, id: &str) {
        self.removals += 1;
        self.rules.remove(&style_element_id(id));
    }
}

/// Full style element text for a space.
pub fn render_space(space: &SpaceDefinition) -> String {
    let mut rules = Vec::with_capacity(2);
    rules.push(main_rule(space));
    for edge in space.handle_edges() {
        rules.push(handle_rule(space, edge));
    }
    if let Some(centered) = centered_rule(space.id(), space.center_content()) {
        rules.push(centered);
    }
    let css = rules.join(" ");
    trace!(id = space.id(), css = %css, "rendered space");
    css
}

fn main_rule(space: &SpaceDefinition) -> String {
    let mut decls = Vec::with_capacity(10);
    decls.push(format!("position: {};", space.position().as_str()));
    for field in GeometryField::ALL {
        if let Some(value) = space.expression(field).css() {
            decls.push(format!("{}: {value};", field.css_name()));
        }
    }
    decls.push(format!("z-index: {};", space.z_index()));
    if space.scrollable() {
        decls.push(String::from("overflow: auto;"));
    }
    if space.handle_placement() == HandlePlacement::Inside {
        let mut padded = false;
        for edge in space.handle_edges() {
            decls.push(format!(
                "padding-{}: {};",
                edge.css_name(),
                format_px(space.handle_size())
            ));
            padded = true;
        }
        if padded {
            decls.push(String::from("box-sizing: border-box;"));
        }
    }
    format!("#{} {{ {} }}", space.id(), decls.join(" "))
}

fn handle_rule(space: &SpaceDefinition, edge: AnchorSide) -> String {
    let size = space.handle_size();
    let offset = match space.handle_placement() {
        HandlePlacement::OverlayInside | HandlePlacement::Inside => 0.0,
        HandlePlacement::OverlayBoundary => -size / 2.0,
    };
    let (span, cursor, thickness) = match edge.orientation() {
        Orientation::Horizontal => ("top: 0px; bottom: 0px;", "ew-resize", "width"),
        Orientation::Vertical => ("left: 0px; right: 0px;", "ns-resize", "height"),
    };
    format!(
        "#{}-{} {{ position: absolute; {}: {}; {span} {thickness}: {}; cursor: {cursor}; }}",
        space.id(),
        edge.handle_suffix(),
        edge.css_name(),
        format_px(offset),
        format_px(size),
    )
}
