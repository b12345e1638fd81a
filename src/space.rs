//! Space definitions: the nodes of the layout tree and the props that describe them.
//!
//! A wrapper layer describes a space with [`SpaceProps`] and hands it to the
//! [`SpaceStore`](crate::SpaceStore), which builds a [`SpaceDefinition`] and
//! owns it for its whole lifetime. Only the store and the gesture controllers
//! mutate definitions.
//!
//! Which of the six geometry expressions a space populates depends on its type:
//!
//! ```text
//!   ViewPort / Fill      left top right bottom
//!   Anchored Left        left top      bottom width
//!   Anchored Right            top right bottom width
//!   Anchored Top         left top right        height
//!   Anchored Bottom      left     right bottom height
//!   Fixed                                      width height
//!   Positioned / Custom  whatever the props give
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::center::CenterType;
use crate::config::SpacesConfig;
use crate::drag::DragEndPosition;
use crate::error::SpaceError;
use crate::measure::DomRect;
use crate::size::{SizeExpression, SizeUnit};

/// Arena index of a live space inside its store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpaceKey(pub(crate) usize);

impl SpaceKey {
    /// Raw arena slot.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of space, which fixes how its geometry is derived.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpaceType {
    /// Top-level space covering the browser viewport (`position: fixed`).
    ViewPort,
    /// Top-level space with an explicit width/height box (`position: relative`).
    Fixed,
    /// Takes whatever its same-layer anchored siblings leave over.
    Fill,
    /// Placed by explicit left/top/right/bottom/width/height. Draggable.
    Positioned,
    /// Pinned to one side of its parent and stacked with same-side siblings.
    Anchored,
    /// Explicit geometry, like `Positioned`, but never dragged.
    Custom,
}

impl SpaceType {
    /// Whether a space of this type may be registered without a parent.
    pub fn is_top_level(self) -> bool {
        matches!(self, Self::ViewPort | Self::Fixed)
    }

    /// CSS `position` mode for this type.
    pub fn position(self) -> CssPosition {
        match self {
            Self::ViewPort => CssPosition::Fixed,
            Self::Fixed => CssPosition::Relative,
            _ => CssPosition::Absolute,
        }
    }
}

/// CSS `position` value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CssPosition {
    Fixed,
    Relative,
    Absolute,
}

impl CssPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Relative => "relative",
            Self::Absolute => "absolute",
        }
    }
}

/// Side of the parent a space is pinned to. Also names a single edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnchorSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl AnchorSide {
    /// All four sides, in the order the recalculation visits them.
    pub const ALL: [Self; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];

    /// Left/Right stack horizontally, Top/Bottom vertically.
    pub fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Horizontal,
            Self::Top | Self::Bottom => Orientation::Vertical,
        }
    }

    /// The facing side.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    /// Geometry field holding this edge's offset.
    pub fn edge_field(self) -> GeometryField {
        match self {
            Self::Left => GeometryField::Left,
            Self::Right => GeometryField::Right,
            Self::Top => GeometryField::Top,
            Self::Bottom => GeometryField::Bottom,
        }
    }

    /// Geometry field measured along this side's axis (width or height).
    pub fn dimension_field(self) -> GeometryField {
        self.orientation().dimension_field()
    }

    pub(crate) fn handle_suffix(self) -> &'static str {
        match self {
            Self::Left => "ml",
            Self::Top => "mt",
            Self::Right => "mr",
            Self::Bottom => "mb",
        }
    }

    pub(crate) fn css_name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
        }
    }
}

/// Stacking axis of an anchored space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Width for horizontal stacking, height for vertical.
    pub fn dimension_field(self) -> GeometryField {
        match self {
            Self::Horizontal => GeometryField::Width,
            Self::Vertical => GeometryField::Height,
        }
    }
}

/// Names one of the six geometry expressions of a space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryField {
    Left,
    Top,
    Right,
    Bottom,
    Width,
    Height,
}

impl GeometryField {
    /// In CSS output order.
    pub const ALL: [Self; 6] = [
        Self::Left,
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Width,
        Self::Height,
    ];

    pub fn css_name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

/// Resize handle location. Corner handles resize two edges at once.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResizeSide {
    Left,
    Top,
    Right,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeSide {
    /// The single edges this handle moves, horizontal edge first.
    pub fn edges(self) -> &'static [AnchorSide] {
        match self {
            Self::Left => &[AnchorSide::Left],
            Self::Top => &[AnchorSide::Top],
            Self::Right => &[AnchorSide::Right],
            Self::Bottom => &[AnchorSide::Bottom],
            Self::TopLeft => &[AnchorSide::Left, AnchorSide::Top],
            Self::TopRight => &[AnchorSide::Right, AnchorSide::Top],
            Self::BottomLeft => &[AnchorSide::Left, AnchorSide::Bottom],
            Self::BottomRight => &[AnchorSide::Right, AnchorSide::Bottom],
        }
    }

    /// Whether the reported size for this handle is a width.
    pub fn is_horizontal(self) -> bool {
        self.edges()[0].orientation() == Orientation::Horizontal
    }
}

impl From<AnchorSide> for ResizeSide {
    fn from(side: AnchorSide) -> Self {
        match side {
            AnchorSide::Left => Self::Left,
            AnchorSide::Right => Self::Right,
            AnchorSide::Top => Self::Top,
            AnchorSide::Bottom => Self::Bottom,
        }
    }
}

/// Where resize strips sit relative to the edge they control.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HandlePlacement {
    /// Inside the box, overlaying content.
    #[default]
    OverlayInside,
    /// Inside the box; the box is padded so content never sits under the strip.
    Inside,
    /// Straddling the edge, half inside and half outside.
    OverlayBoundary,
}

/// Everything a wrapper can say about a space.
///
/// Constructors cover each [`SpaceType`]; the remaining fields are set with
/// the builder methods. The store diffs these field by field on update.
///
/// ```
/// use spacelayout::{AnchorSide, SpaceProps};
///
/// let sidebar = SpaceProps::anchored(AnchorSide::Left, "20%")
///     .id("sidebar")
///     .resizable(true)
///     .minimum_size(100.0);
/// assert_eq!(sidebar.anchor, Some(AnchorSide::Left));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpaceProps {
    pub id: Option<String>,
    pub space_type: SpaceType,
    pub anchor: Option<AnchorSide>,
    /// Anchor-dimension size for `Anchored` spaces.
    pub size: Option<SizeUnit>,
    pub left: Option<SizeUnit>,
    pub top: Option<SizeUnit>,
    pub right: Option<SizeUnit>,
    pub bottom: Option<SizeUnit>,
    pub width: Option<SizeUnit>,
    pub height: Option<SizeUnit>,
    /// Stacking order among same-side siblings. `None` appends after them.
    pub order: Option<i32>,
    pub z_index: i32,
    pub scrollable: bool,
    pub center_content: CenterType,
    pub minimum_size: Option<f64>,
    pub maximum_size: Option<f64>,
    pub handle_size: Option<f64>,
    pub handle_placement: Option<HandlePlacement>,
    /// Anchored spaces: show a handle on the edge facing away from the anchor.
    pub resizable: bool,
    /// Positioned and custom spaces: explicit handle list.
    pub resize_handles: Vec<ResizeSide>,
}

impl SpaceProps {
    /// Props of the given type with every optional field empty.
    pub fn new(space_type: SpaceType) -> Self {
        Self {
            id: None,
            space_type,
            anchor: None,
            size: None,
            left: None,
            top: None,
            right: None,
            bottom: None,
            width: None,
            height: None,
            order: None,
            z_index: 0,
            scrollable: false,
            center_content: CenterType::None,
            minimum_size: None,
            maximum_size: None,
            handle_size: None,
            handle_placement: None,
            resizable: false,
            resize_handles: Vec::new(),
        }
    }

    /// Top-level space covering the viewport.
    pub fn viewport() -> Self {
        Self::new(SpaceType::ViewPort)
    }

    /// Top-level box of an explicit size.
    pub fn fixed(width: Option<SizeUnit>, height: impl Into<SizeUnit>) -> Self {
        let mut props = Self::new(SpaceType::Fixed);
        props.width = width;
        props.height = Some(height.into());
        props
    }

    /// Space filling what its anchored siblings leave.
    pub fn fill() -> Self {
        Self::new(SpaceType::Fill)
    }

    /// Space pinned to `anchor` with the given anchor-dimension size.
    pub fn anchored(anchor: AnchorSide, size: impl Into<SizeUnit>) -> Self {
        let mut props = Self::new(SpaceType::Anchored);
        props.anchor = Some(anchor);
        props.size = Some(size.into());
        props
    }

    /// Freely positioned space; set its edges with the builder methods.
    pub fn positioned() -> Self {
        Self::new(SpaceType::Positioned)
    }

    /// Explicit-geometry space that is never dragged.
    pub fn custom() -> Self {
        Self::new(SpaceType::Custom)
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn size(mut self, size: impl Into<SizeUnit>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn left(mut self, v: impl Into<SizeUnit>) -> Self {
        self.left = Some(v.into());
        self
    }

    pub fn top(mut self, v: impl Into<SizeUnit>) -> Self {
        self.top = Some(v.into());
        self
    }

    pub fn right(mut self, v: impl Into<SizeUnit>) -> Self {
        self.right = Some(v.into());
        self
    }

    pub fn bottom(mut self, v: impl Into<SizeUnit>) -> Self {
        self.bottom = Some(v.into());
        self
    }

    pub fn width(mut self, v: impl Into<SizeUnit>) -> Self {
        self.width = Some(v.into());
        self
    }

    pub fn height(mut self, v: impl Into<SizeUnit>) -> Self {
        self.height = Some(v.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn scrollable(mut self, scrollable: bool) -> Self {
        self.scrollable = scrollable;
        self
    }

    pub fn center_content(mut self, center: CenterType) -> Self {
        self.center_content = center;
        self
    }

    pub fn minimum_size(mut self, size: f64) -> Self {
        self.minimum_size = Some(size);
        self
    }

    pub fn maximum_size(mut self, size: f64) -> Self {
        self.maximum_size = Some(size);
        self
    }

    pub fn handle_size(mut self, size: f64) -> Self {
        self.handle_size = Some(size);
        self
    }

    pub fn handle_placement(mut self, placement: HandlePlacement) -> Self {
        self.handle_placement = Some(placement);
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn resize_handles(mut self, handles: &[ResizeSide]) -> Self {
        self.resize_handles = handles.to_vec();
        self
    }

    /// Base sizes of the six geometry fields, in [`GeometryField::ALL`] order.
    pub(crate) fn base_geometry(&self, id: &str) -> Result<[Option<SizeUnit>; 6], SpaceError> {
        let zero = || Some(SizeUnit::px(0.0));
        let or_zero = |v: &Option<SizeUnit>| v.clone().or_else(zero);
        let g = match self.space_type {
            SpaceType::ViewPort => [
                or_zero(&self.left),
                or_zero(&self.top),
                or_zero(&self.right),
                or_zero(&self.bottom),
                None,
                None,
            ],
            SpaceType::Fill => [zero(), zero(), zero(), zero(), None, None],
            SpaceType::Fixed => [None, None, None, None, self.width.clone(), self.height.clone()],
            SpaceType::Positioned | SpaceType::Custom => [
                self.left.clone(),
                self.top.clone(),
                self.right.clone(),
                self.bottom.clone(),
                self.width.clone(),
                self.height.clone(),
            ],
            SpaceType::Anchored => {
                let anchor = self
                    .anchor
                    .ok_or_else(|| SpaceError::MissingAnchor { id: id.into() })?;
                let size = self.size.clone();
                match anchor {
                    AnchorSide::Left => [zero(), zero(), None, zero(), size, None],
                    AnchorSide::Right => [None, zero(), zero(), zero(), size, None],
                    AnchorSide::Top => [zero(), zero(), zero(), None, None, size],
                    AnchorSide::Bottom => [zero(), None, zero(), zero(), None, size],
                }
            }
        };
        Ok(g)
    }

    /// Handles this space shows, derived from type and resize flags.
    pub(crate) fn derived_handles(&self) -> Vec<ResizeSide> {
        match self.space_type {
            SpaceType::Anchored if self.resizable => self
                .anchor
                .map(|a| alloc::vec![ResizeSide::from(a.opposite())])
                .unwrap_or_default(),
            SpaceType::Positioned | SpaceType::Custom => self.resize_handles.clone(),
            _ => Vec::new(),
        }
    }
}

/// Wrapper hooks invoked by the store and the gesture controllers.
#[derive(Default)]
pub struct SpaceCallbacks {
    /// Re-render request, invoked on a parent when a gesture on a child ends.
    pub on_update: Option<Box<dyn FnMut()>>,
    /// Called before a resize starts; returning `false` cancels it.
    pub on_resize_start: Option<Box<dyn FnMut() -> bool>>,
    /// Final floored size, rendered box and handle of a finished resize.
    pub on_resize_end: Option<Box<dyn FnMut(u32, DomRect, ResizeSide)>>,
    /// Parent-relative box of a finished drag and whether the pointer moved.
    pub on_drag_end: Option<Box<dyn FnMut(DragEndPosition, bool)>>,
}

impl fmt::Debug for SpaceCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpaceCallbacks")
            .field("on_update", &self.on_update.is_some())
            .field("on_resize_start", &self.on_resize_start.is_some())
            .field("on_resize_end", &self.on_resize_end.is_some())
            .field("on_drag_end", &self.on_drag_end.is_some())
            .finish()
    }
}

/// A node of the layout tree.
#[derive(Debug)]
pub struct SpaceDefinition {
    pub(crate) id: String,
    pub(crate) parent: Option<SpaceKey>,
    pub(crate) children: Vec<SpaceKey>,
    pub(crate) space_type: SpaceType,
    pub(crate) anchor: Option<AnchorSide>,
    pub(crate) order: i32,
    pub(crate) explicit_order: Option<i32>,
    pub(crate) z_index: i32,
    pub(crate) left: SizeExpression,
    pub(crate) top: SizeExpression,
    pub(crate) right: SizeExpression,
    pub(crate) bottom: SizeExpression,
    pub(crate) width: SizeExpression,
    pub(crate) height: SizeExpression,
    pub(crate) minimum_size: Option<f64>,
    pub(crate) maximum_size: Option<f64>,
    pub(crate) handles: Vec<ResizeSide>,
    pub(crate) handle_size: f64,
    pub(crate) handle_placement: HandlePlacement,
    pub(crate) scrollable: bool,
    pub(crate) center_content: CenterType,
    pub(crate) resizing: bool,
    pub(crate) dragging: bool,
    pub(crate) dimension: Option<DomRect>,
    pub(crate) callbacks: SpaceCallbacks,
}

impl SpaceDefinition {
    pub(crate) fn from_props(
        id: String,
        parent: Option<SpaceKey>,
        props: &SpaceProps,
        config: &SpacesConfig,
    ) -> Result<Self, SpaceError> {
        let [left, top, right, bottom, width, height] = props.base_geometry(&id)?;
        Ok(Self {
            parent,
            children: Vec::new(),
            space_type: props.space_type,
            anchor: match props.space_type {
                SpaceType::Anchored => props.anchor,
                _ => None,
            },
            order: props.order.unwrap_or(0),
            explicit_order: props.order,
            z_index: props.z_index,
            left: SizeExpression::from_size(left),
            top: SizeExpression::from_size(top),
            right: SizeExpression::from_size(right),
            bottom: SizeExpression::from_size(bottom),
            width: SizeExpression::from_size(width),
            height: SizeExpression::from_size(height),
            minimum_size: props.minimum_size,
            maximum_size: props.maximum_size,
            handles: props.derived_handles(),
            handle_size: props
                .handle_size
                .unwrap_or_else(|| config.effective_handle_size()),
            handle_placement: props.handle_placement.unwrap_or(config.handle_placement),
            scrollable: props.scrollable,
            center_content: props.center_content,
            resizing: false,
            dragging: false,
            dimension: None,
            callbacks: SpaceCallbacks::default(),
            id,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> Option<SpaceKey> {
        self.parent
    }

    /// Children in registration order.
    pub fn children(&self) -> &[SpaceKey] {
        &self.children
    }

    pub fn space_type(&self) -> SpaceType {
        self.space_type
    }

    pub fn anchor(&self) -> Option<AnchorSide> {
        self.anchor
    }

    /// Stacking axis; only anchored spaces have one.
    pub fn orientation(&self) -> Option<Orientation> {
        self.anchor.map(AnchorSide::orientation)
    }

    pub fn position(&self) -> CssPosition {
        self.space_type.position()
    }

    /// Effective stacking order (explicit or assigned at registration).
    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn left(&self) -> &SizeExpression {
        &self.left
    }

    pub fn top(&self) -> &SizeExpression {
        &self.top
    }

    pub fn right(&self) -> &SizeExpression {
        &self.right
    }

    pub fn bottom(&self) -> &SizeExpression {
        &self.bottom
    }

    pub fn width(&self) -> &SizeExpression {
        &self.width
    }

    pub fn height(&self) -> &SizeExpression {
        &self.height
    }

    /// Expression for any geometry field.
    pub fn expression(&self, field: GeometryField) -> &SizeExpression {
        match field {
            GeometryField::Left => &self.left,
            GeometryField::Top => &self.top,
            GeometryField::Right => &self.right,
            GeometryField::Bottom => &self.bottom,
            GeometryField::Width => &self.width,
            GeometryField::Height => &self.height,
        }
    }

    pub(crate) fn expression_mut(&mut self, field: GeometryField) -> &mut SizeExpression {
        match field {
            GeometryField::Left => &mut self.left,
            GeometryField::Top => &mut self.top,
            GeometryField::Right => &mut self.right,
            GeometryField::Bottom => &mut self.bottom,
            GeometryField::Width => &mut self.width,
            GeometryField::Height => &mut self.height,
        }
    }

    /// Width for horizontal anchors, height for vertical ones.
    pub fn anchor_dimension(&self) -> Option<&SizeExpression> {
        self.anchor.map(|a| self.expression(a.dimension_field()))
    }

    pub fn minimum_size(&self) -> Option<f64> {
        self.minimum_size
    }

    pub fn maximum_size(&self) -> Option<f64> {
        self.maximum_size
    }

    pub fn handle_size(&self) -> f64 {
        self.handle_size
    }

    pub fn handle_placement(&self) -> HandlePlacement {
        self.handle_placement
    }

    /// Handles this space shows.
    pub fn resize_handles(&self) -> &[ResizeSide] {
        &self.handles
    }

    /// Whether any handle moves the given edge.
    pub fn can_resize(&self, edge: AnchorSide) -> bool {
        self.handles.iter().any(|h| h.edges().contains(&edge))
    }

    pub fn can_resize_left(&self) -> bool {
        self.can_resize(AnchorSide::Left)
    }

    pub fn can_resize_top(&self) -> bool {
        self.can_resize(AnchorSide::Top)
    }

    pub fn can_resize_right(&self) -> bool {
        self.can_resize(AnchorSide::Right)
    }

    pub fn can_resize_bottom(&self) -> bool {
        self.can_resize(AnchorSide::Bottom)
    }

    /// Edges that carry a resize strip, in CSS output order.
    pub(crate) fn handle_edges(&self) -> impl Iterator<Item = AnchorSide> + '_ {
        AnchorSide::ALL.into_iter().filter(|&e| self.can_resize(e))
    }

    /// True only while a resize session is running.
    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub(crate) fn has_gesture(&self) -> bool {
        self.resizing || self.dragging
    }

    pub fn scrollable(&self) -> bool {
        self.scrollable
    }

    pub fn center_content(&self) -> CenterType {
        self.center_content
    }

    /// Last box recorded by [`SpaceStore::measure`](crate::SpaceStore::measure).
    pub fn dimension(&self) -> Option<DomRect> {
        self.dimension
    }

    /// Replace the adjustment list of one edge; `true` if it changed.
    pub(crate) fn adjust_edge(&mut self, edge: AnchorSide, adjusted: Vec<SizeUnit>) -> bool {
        self.expression_mut(edge.edge_field()).set_adjusted(adjusted)
    }

    /// Adjust the edge this space is anchored to.
    pub(crate) fn adjust_anchor_edge(
        &mut self,
        adjusted: Vec<SizeUnit>,
    ) -> Result<bool, SpaceError> {
        match self.anchor {
            Some(anchor) => Ok(self.adjust_edge(anchor, adjusted)),
            None => Err(SpaceError::MissingAnchor {
                id: self.id.clone(),
            }),
        }
    }

    /// Terms this space contributes to a sibling stacked after it: its
    /// anchor-dimension base size (unless zero) and any resize delta.
    pub(crate) fn stacking_terms(&self, out: &mut Vec<SizeUnit>) {
        let Some(dim) = self.anchor_dimension() else {
            return;
        };
        if let Some(size) = &dim.size
            && !size.is_zero()
        {
            out.push(size.clone());
        }
        if dim.resized != 0.0 {
            out.push(SizeUnit::px(dim.resized));
        }
    }
}
