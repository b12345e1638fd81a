//! The space store: owner of the layout tree and its recalculation engine.
//!
//! Every mutation goes through [`SpaceStore`]. After any structural or sizing
//! change the store recalculates the parent's children, rewriting only the
//! `adjusted` lists that actually differ, and re-renders exactly those
//! siblings plus the space that changed.
//!
//! # Recalculation
//!
//! Siblings are partitioned by `z_index` (layers never adjust each other).
//! Within a layer, anchored siblings are grouped by anchor side and sorted by
//! `order`. On equal orders an explicit order sorts before an assigned one, and
//! equal explicit orders keep registration order. Then:
//!
//! - an `Anchored` child's anchor edge clears every same-side sibling sorted
//!   before it;
//! - a `Fill` child's four edges clear every anchored sibling on that side.
//!
//! Each cleared sibling contributes its anchor-dimension base size (unless it
//! is zero) and its resize delta (unless it is zero).
//!
//! Horizontal and vertical anchors in the same layer are adjusted on separate
//! axes, so a Left and a Top sibling overlap in the top-left corner. This is
//! the layout contract, not a packing bug.
//!
//! # Example
//!
//! ```
//! use spacelayout::{AnchorSide, SpaceProps, SpaceStore};
//!
//! let mut store = SpaceStore::new();
//! let root = store.register(None, SpaceProps::viewport().id("app")).unwrap();
//! store.register(Some("app"), SpaceProps::anchored(AnchorSide::Left, 200).id("nav")).unwrap();
//! let fill = store.register(Some("app"), SpaceProps::fill().id("main")).unwrap();
//!
//! assert_eq!(store.space(fill).unwrap().left().css().as_deref(), Some("calc(0px + 200px)"));
//! assert_eq!(store.children(root).unwrap().len(), 2);
//! ```

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::config::SpacesConfig;
use crate::error::SpaceError;
use crate::logging::{debug, trace};
use crate::measure::{DomRect, ElementMeasure};
use crate::size::{SizeExpression, SizeUnit};
use crate::space::{
    AnchorSide, GeometryField, SpaceCallbacks, SpaceDefinition, SpaceKey, SpaceProps, SpaceType,
};
use crate::style::{RecordingSheet, StyleSink, render_space};

/// Owns every live space of one layout tree.
///
/// Create one store per independent tree (per document, per server render,
/// per test) and drop or [`dispose`](Self::dispose) it with the tree.
#[derive(Debug)]
pub struct SpaceStore<S = RecordingSheet> {
    config: SpacesConfig,
    sink: S,
    slots: Vec<Option<SpaceDefinition>>,
    ids: BTreeMap<String, SpaceKey>,
    next_id: u64,
}

impl SpaceStore<RecordingSheet> {
    /// Store with default configuration writing into a [`RecordingSheet`].
    pub fn new() -> Self {
        Self::with_sink(SpacesConfig::default(), RecordingSheet::new())
    }

    /// Store with custom configuration writing into a [`RecordingSheet`].
    pub fn with_config(config: SpacesConfig) -> Self {
        Self::with_sink(config, RecordingSheet::new())
    }
}

impl Default for SpaceStore<RecordingSheet> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StyleSink> SpaceStore<S> {
    /// Store writing rules into `sink`.
    pub fn with_sink(config: SpacesConfig, sink: S) -> Self {
        Self {
            config,
            sink,
            slots: Vec::new(),
            ids: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &SpacesConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Number of live spaces.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, key: SpaceKey) -> Option<&SpaceDefinition> {
        self.slots.get(key.0).and_then(Option::as_ref)
    }

    /// Like [`get`](Self::get), but an error for dead keys.
    pub fn space(&self, key: SpaceKey) -> Result<&SpaceDefinition, SpaceError> {
        self.get(key).ok_or(SpaceError::UnknownSpace { key })
    }

    pub(crate) fn space_mut(&mut self, key: SpaceKey) -> Result<&mut SpaceDefinition, SpaceError> {
        self.slots
            .get_mut(key.0)
            .and_then(Option::as_mut)
            .ok_or(SpaceError::UnknownSpace { key })
    }

    /// Key of the live space with this id.
    pub fn key_of(&self, id: &str) -> Option<SpaceKey> {
        self.ids.get(id).copied()
    }

    /// Children of `key` in registration order.
    pub fn children(&self, key: SpaceKey) -> Result<&[SpaceKey], SpaceError> {
        self.space(key).map(SpaceDefinition::children)
    }

    /// Live spaces in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (SpaceKey, &SpaceDefinition)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (SpaceKey(i), s)))
    }

    /// Wrapper hooks of a space.
    pub fn callbacks_mut(&mut self, key: SpaceKey) -> Result<&mut SpaceCallbacks, SpaceError> {
        self.space_mut(key).map(|s| &mut s.callbacks)
    }

    // ---- Lifecycle ----

    /// Build a space from props without inserting it.
    ///
    /// Assigns an id when the props carry none. Fails when the id is taken,
    /// the parent is unknown, a non-top-level space has no parent, or an
    /// anchored space has no anchor.
    pub fn create_space(
        &mut self,
        parent_id: Option<&str>,
        props: SpaceProps,
        on_update: Option<Box<dyn FnMut()>>,
    ) -> Result<SpaceDefinition, SpaceError> {
        let id = match &props.id {
            Some(id) if self.ids.contains_key(id) => {
                return Err(SpaceError::DuplicateId { id: id.clone() });
            }
            Some(id) => id.clone(),
            None => self.generate_id(),
        };

        let parent = match parent_id {
            Some(p) => Some(self.key_of(p).ok_or_else(|| SpaceError::UnknownParent {
                id: id.clone(),
                parent: p.into(),
            })?),
            None if !props.space_type.is_top_level() => {
                return Err(SpaceError::MissingAncestor { id });
            }
            None => None,
        };

        let mut space = SpaceDefinition::from_props(id, parent, &props, &self.config)?;
        space.callbacks.on_update = on_update;
        Ok(space)
    }

    /// Insert a space built by [`create_space`](Self::create_space).
    ///
    /// Anchored spaces without an explicit order are stacked after every
    /// same-side sibling in their layer.
    pub fn add_space(&mut self, mut space: SpaceDefinition) -> Result<SpaceKey, SpaceError> {
        if self.ids.contains_key(&space.id) {
            return Err(SpaceError::DuplicateId { id: space.id });
        }
        if let Some(parent) = space.parent {
            self.space(parent)?;
        }
        if let (Some(anchor), None) = (space.anchor, space.explicit_order) {
            space.order = self.next_order(space.parent, anchor, space.z_index, None);
        }

        let key = SpaceKey(self.slots.len());
        let parent = space.parent;
        debug!(id = %space.id, parent = ?parent, kind = ?space.space_type, "space added");
        self.ids.insert(space.id.clone(), key);
        self.slots.push(Some(space));

        let mut dirty = match parent {
            Some(p) => {
                self.space_mut(p)?.children.push(key);
                self.recalculate(p)?
            }
            None => Vec::new(),
        };
        if !dirty.contains(&key) {
            dirty.push(key);
        }
        self.push_styles(&dirty)?;
        Ok(key)
    }

    /// [`create_space`](Self::create_space) followed by [`add_space`](Self::add_space).
    pub fn register(
        &mut self,
        parent_id: Option<&str>,
        props: SpaceProps,
    ) -> Result<SpaceKey, SpaceError> {
        let space = self.create_space(parent_id, props, None)?;
        self.add_space(space)
    }

    /// Remove a space and its whole subtree, dropping their rules and
    /// restacking the remaining siblings.
    pub fn remove_space(&mut self, key: SpaceKey) -> Result<(), SpaceError> {
        let parent = self.space(key)?.parent;

        let mut doomed = alloc::vec![key];
        let mut i = 0;
        while i < doomed.len() {
            let next = doomed[i];
            doomed.extend(self.space(next)?.children.iter().copied());
            i += 1;
        }
        for k in doomed {
            if let Some(space) = self.slots.get_mut(k.0).and_then(Option::take) {
                debug!(id = %space.id, "space removed");
                self.ids.remove(&space.id);
                self.sink.remove_rule(&space.id);
            }
        }

        if let Some(p) = parent
            && let Some(parent_space) = self.slots.get_mut(p.0).and_then(Option::as_mut)
        {
            parent_space.children.retain(|&c| c != key);
            let dirty = self.recalculate(p)?;
            self.push_styles(&dirty)?;
        }
        Ok(())
    }

    /// Apply new props to a live space.
    ///
    /// Returns `false`, and writes nothing, when no tracked field differs.
    /// A changed base size resets that field's `adjusted` and `resized`; a
    /// changed type or anchor resets all six.
    pub fn update_space(&mut self, key: SpaceKey, props: &SpaceProps) -> Result<bool, SpaceError> {
        let (id, parent, kind_changed, restack) = {
            let s = self.space(key)?;
            let anchor = match props.space_type {
                SpaceType::Anchored => props.anchor,
                _ => None,
            };
            let kind_changed = s.space_type != props.space_type || s.anchor != anchor;
            (
                s.id.clone(),
                s.parent,
                kind_changed,
                kind_changed || s.z_index != props.z_index,
            )
        };

        let mut fresh = SpaceDefinition::from_props(id, parent, props, &self.config)?;
        if restack
            && fresh.explicit_order.is_none()
            && let Some(anchor) = fresh.anchor
        {
            fresh.order = self.next_order(parent, anchor, fresh.z_index, Some(key));
        }

        let space = self.space_mut(key)?;
        if !merge(space, fresh, kind_changed, restack) {
            return Ok(false);
        }
        debug!(id = %space.id, "space updated");
        self.update_styles(key)?;
        Ok(true)
    }

    /// Recalculate the siblings of `key` and re-render the ones that moved,
    /// plus `key` itself. Called after every resize or drag tick.
    pub fn update_styles(&mut self, key: SpaceKey) -> Result<(), SpaceError> {
        let mut dirty = match self.space(key)?.parent {
            Some(p) => self.recalculate(p)?,
            None => Vec::new(),
        };
        if !dirty.contains(&key) {
            dirty.push(key);
        }
        self.push_styles(&dirty)
    }

    /// Clear the resizing and dragging flags of a space whose session was
    /// dropped without `finish` or `cancel`, then re-render it.
    ///
    /// Deltas already applied stay. Returns whether a gesture was active.
    pub fn abort_gesture(&mut self, key: SpaceKey) -> Result<bool, SpaceError> {
        let space = self.space_mut(key)?;
        let active = space.has_gesture();
        if !active {
            return Ok(false);
        }
        space.resizing = false;
        space.dragging = false;
        debug!(id = %space.id, "gesture aborted");
        self.update_styles(key)?;
        Ok(true)
    }

    /// Drop every space and its rules.
    pub fn dispose(&mut self) {
        for space in self.slots.drain(..).flatten() {
            self.sink.remove_rule(&space.id);
        }
        self.ids.clear();
    }

    // ---- Recalculation ----

    /// Recompute the `adjusted` lists of `parent`'s children.
    ///
    /// Returns the children whose lists changed; nothing is rendered.
    pub fn recalculate(&mut self, parent: SpaceKey) -> Result<Vec<SpaceKey>, SpaceError> {
        let children = self.space(parent)?.children.clone();
        let mut changed = Vec::new();

        for &child in &children {
            let (kind, z_index, anchor) = {
                let c = self.space(child)?;
                (c.space_type, c.z_index, c.anchor)
            };
            let dirty = match kind {
                SpaceType::Fill => {
                    let mut dirty = false;
                    for side in AnchorSide::ALL {
                        let adjusted = self.stack_offsets(&children, side, z_index, None);
                        dirty |= self.space_mut(child)?.adjust_edge(side, adjusted);
                    }
                    dirty
                }
                SpaceType::Anchored => {
                    let adjusted = match anchor {
                        Some(side) => self.stack_offsets(&children, side, z_index, Some(child)),
                        None => Vec::new(),
                    };
                    self.space_mut(child)?.adjust_anchor_edge(adjusted)?
                }
                _ => false,
            };
            if dirty {
                changed.push(child);
            }
        }

        trace!(
            parent = ?parent,
            children = children.len(),
            changed = changed.len(),
            "recalculated"
        );
        Ok(changed)
    }

    /// Anchored children of `parent` on `side` in layer `z_index`, in stacking order.
    pub fn anchored_children(
        &self,
        parent: SpaceKey,
        side: AnchorSide,
        z_index: i32,
    ) -> Result<Vec<SpaceKey>, SpaceError> {
        Ok(self.stack(self.children(parent)?, side, z_index))
    }

    fn stack(&self, children: &[SpaceKey], side: AnchorSide, z_index: i32) -> Vec<SpaceKey> {
        let mut stack: Vec<((i32, bool), SpaceKey)> = children
            .iter()
            .filter_map(|&k| {
                let s = self.get(k)?;
                (s.space_type == SpaceType::Anchored
                    && s.anchor == Some(side)
                    && s.z_index == z_index)
                    .then_some(((s.order, s.explicit_order.is_none()), k))
            })
            .collect();
        // Explicit orders win ties against assigned ones; the sort is stable
        // so equal explicit orders keep registration order.
        stack.sort_by_key(|&(rank, _)| rank);
        stack.into_iter().map(|(_, k)| k).collect()
    }

    /// Terms of every stacked sibling before `until` (all of them when `None`).
    fn stack_offsets(
        &self,
        children: &[SpaceKey],
        side: AnchorSide,
        z_index: i32,
        until: Option<SpaceKey>,
    ) -> Vec<SizeUnit> {
        let mut out = Vec::new();
        for k in self.stack(children, side, z_index) {
            if Some(k) == until {
                break;
            }
            if let Some(s) = self.get(k) {
                s.stacking_terms(&mut out);
            }
        }
        out
    }

    fn next_order(
        &self,
        parent: Option<SpaceKey>,
        side: AnchorSide,
        z_index: i32,
        exclude: Option<SpaceKey>,
    ) -> i32 {
        let Some(children) = parent.and_then(|p| self.get(p)).map(SpaceDefinition::children) else {
            return 0;
        };
        self.stack(children, side, z_index)
            .into_iter()
            .filter(|&k| Some(k) != exclude)
            .filter_map(|k| self.get(k).map(SpaceDefinition::order))
            .max()
            .map_or(0, |max| max + 1)
    }

    // ---- Output ----

    /// Style element text for a space.
    pub fn render(&self, key: SpaceKey) -> Result<String, SpaceError> {
        self.space(key).map(render_space)
    }

    fn push_styles(&mut self, keys: &[SpaceKey]) -> Result<(), SpaceError> {
        for &key in keys {
            let space = self
                .slots
                .get(key.0)
                .and_then(Option::as_ref)
                .ok_or(SpaceError::UnknownSpace { key })?;
            let css = render_space(space);
            self.sink.write_rule(&space.id, &css);
        }
        Ok(())
    }

    // ---- Measurement and notifications ----

    /// Measure a space and remember the box as its last known dimension.
    pub fn measure<M: ElementMeasure>(&mut self, key: SpaceKey, measure: &M) -> Option<DomRect> {
        let rect = measure.bounding_rect(self, key)?;
        if let Some(space) = self.slots.get_mut(key.0).and_then(Option::as_mut) {
            space.dimension = Some(rect);
        }
        Some(rect)
    }

    /// Last box recorded by [`measure`](Self::measure).
    pub fn dimension(&self, key: SpaceKey) -> Option<DomRect> {
        self.get(key).and_then(SpaceDefinition::dimension)
    }

    /// Ask the wrapper of `key` to re-render.
    pub(crate) fn notify_update(&mut self, key: SpaceKey) {
        if let Some(callback) = self
            .slots
            .get_mut(key.0)
            .and_then(Option::as_mut)
            .and_then(|s| s.callbacks.on_update.as_mut())
        {
            callback();
        }
    }

    fn generate_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("{}{}", self.config.id_prefix, self.next_id);
            if !self.ids.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Fold `fresh` into `current`, reporting whether any tracked field changed.
///
/// `restack` means the space joined a different stack (type, anchor or layer
/// changed) and takes the order assigned there.
fn merge(
    current: &mut SpaceDefinition,
    fresh: SpaceDefinition,
    kind_changed: bool,
    restack: bool,
) -> bool {
    let mut changed = kind_changed;
    if kind_changed {
        current.space_type = fresh.space_type;
        current.anchor = fresh.anchor;
    }

    for field in GeometryField::ALL {
        let size = &fresh.expression(field).size;
        let expr = current.expression_mut(field);
        if kind_changed || expr.size != *size {
            changed |= expr.size != *size;
            *expr = SizeExpression::from_size(size.clone());
        }
    }

    if (restack || fresh.explicit_order.is_some()) && current.order != fresh.order {
        current.order = fresh.order;
        changed = true;
    }
    current.explicit_order = fresh.explicit_order;

    macro_rules! sync {
        ($($field:ident),* $(,)?) => {
            $(
                if current.$field != fresh.$field {
                    current.$field = fresh.$field;
                    changed = true;
                }
            )*
        };
    }
    sync!(
        z_index,
        scrollable,
        center_content,
        minimum_size,
        maximum_size,
        handles,
        handle_size,
        handle_placement,
    );
    changed
}
