//! Layout properties of the space store, checked through the public API.
//!
//! 1. Identical updates write nothing.
//! 2. Fully-zero expressions render `0px`.
//! 3. Same-side siblings stack by order.
//! 4. Fill clears every anchor in its layer.
//! 5. Layers never adjust each other (property-based).
//! 6. Removing a sibling shifts later ones down by exactly its size.
//! 7. The headless resolver agrees with the emitted expressions.

use proptest::prelude::*;
use spacelayout::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn store_with_root() -> (SpaceStore, SpaceKey) {
    let mut store = SpaceStore::new();
    let root = store.register(None, SpaceProps::viewport().id("root")).unwrap();
    (store, root)
}

fn css(store: &SpaceStore, key: SpaceKey, field: GeometryField) -> Option<String> {
    store.space(key).unwrap().expression(field).css()
}

fn pixels(expr: &SizeExpression) -> f64 {
    expr.adjusted
        .iter()
        .map(|u| u.resolve(0.0).unwrap_or(f64::NAN))
        .sum()
}

/// Sink that keeps every write in order.
#[derive(Default)]
struct Journal {
    writes: Vec<(String, String)>,
    removed: Vec<String>,
}

impl StyleSink for Journal {
    fn write_rule(&mut self, id: &str, css: &str) {
        self.writes.push((id.into(), css.into()));
    }

    fn remove_rule(&mut self, id: &str) {
        self.removed.push(id.into());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Idempotence
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn identical_props_write_once() {
    let (mut store, _) = store_with_root();
    let props = SpaceProps::anchored(AnchorSide::Top, 60).id("header").z_index(1);
    let key = store.register(Some("root"), props.clone().size(80)).unwrap();
    let before = store.sink().writes();

    assert!(store.update_space(key, &props).unwrap());
    assert!(!store.update_space(key, &props).unwrap());
    assert_eq!(store.sink().writes(), before + 1);
}

#[test]
fn custom_sink_receives_every_rule() {
    let mut store = SpaceStore::with_sink(SpacesConfig::default(), Journal::default());
    store.register(None, SpaceProps::viewport().id("root")).unwrap();
    let nav = store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Left, 100).id("nav"))
        .unwrap();
    store.register(Some("root"), SpaceProps::fill().id("main")).unwrap();
    store.remove_space(nav).unwrap();

    let ids: Vec<&str> = store.sink().writes.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, ["root", "nav", "main", "main"]);
    assert_eq!(store.sink().removed, ["nav"]);
    let (_, last) = store.sink().writes.last().unwrap();
    assert!(last.contains("left: 0px;"));
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Zero-collapse
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn zero_expression_renders_zero_px() {
    assert_eq!(SizeExpression::new(0).css().as_deref(), Some("0px"));
    assert_eq!(SizeExpression::new(0.0).css().as_deref(), Some("0px"));
    assert_eq!(SizeExpression::new(-0.0).css().as_deref(), Some("0px"));
}

proptest! {
    #[test]
    fn zero_base_with_terms_is_never_collapsed(
        terms in proptest::collection::vec(1i32..500, 1..6),
    ) {
        let mut e = SizeExpression::new(0);
        e.adjusted = terms.iter().map(|&t| SizeUnit::from(t)).collect();
        let css = e.css().unwrap();
        prop_assert!(css.starts_with("calc(0px + "), "{}", css);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Stacking order
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn three_left_spaces_stack() {
    let (mut store, _) = store_with_root();
    let keys: Vec<SpaceKey> = [(150, 2), (50, 0), (100, 1)]
        .into_iter()
        .map(|(w, o)| {
            store
                .register(Some("root"), SpaceProps::anchored(AnchorSide::Left, w).order(o))
                .unwrap()
        })
        .collect();

    assert_eq!(
        css(&store, keys[1], GeometryField::Left).as_deref(),
        Some("0px")
    );
    assert_eq!(
        css(&store, keys[2], GeometryField::Left).as_deref(),
        Some("calc(0px + 50px)")
    );
    assert_eq!(
        css(&store, keys[0], GeometryField::Left).as_deref(),
        Some("calc(0px + 50px + 100px)")
    );
}

#[test]
fn bottom_stack_grows_upwards() {
    let (mut store, _) = store_with_root();
    let footer = store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Bottom, 30))
        .unwrap();
    let status = store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Bottom, "5%"))
        .unwrap();
    assert_eq!(css(&store, footer, GeometryField::Bottom).as_deref(), Some("0px"));
    assert_eq!(
        css(&store, status, GeometryField::Bottom).as_deref(),
        Some("calc(0px + 30px)")
    );
    assert_eq!(css(&store, status, GeometryField::Height).as_deref(), Some("5%"));
}

proptest! {
    #[test]
    fn offset_is_sum_of_earlier_sizes(widths in proptest::collection::vec(1i32..300, 1..8)) {
        let (mut store, _) = store_with_root();
        let keys: Vec<SpaceKey> = widths
            .iter()
            .map(|&w| {
                let props = SpaceProps::anchored(AnchorSide::Right, w);
                store.register(Some("root"), props).unwrap()
            })
            .collect();

        let mut expected = 0.0;
        for (key, &w) in keys.iter().zip(&widths) {
            let right = store.space(*key).unwrap().right();
            prop_assert_eq!(pixels(right), expected);
            expected += f64::from(w);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Fill
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn fill_clears_percentage_anchors() {
    let (mut store, _) = store_with_root();
    store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Left, "20%"))
        .unwrap();
    store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Top, "20%"))
        .unwrap();
    let fill = store.register(Some("root"), SpaceProps::fill().id("body")).unwrap();

    assert_eq!(css(&store, fill, GeometryField::Left).as_deref(), Some("calc(0px + 20%)"));
    assert_eq!(css(&store, fill, GeometryField::Top).as_deref(), Some("calc(0px + 20%)"));
    assert_eq!(css(&store, fill, GeometryField::Right).as_deref(), Some("0px"));
    assert_eq!(css(&store, fill, GeometryField::Bottom).as_deref(), Some("0px"));
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Layer isolation
// ═════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
enum Child {
    Anchored { side: AnchorSide, size: i32, z: i32 },
    Fill { z: i32 },
}

fn child() -> impl Strategy<Value = Child> {
    let side = prop_oneof![
        Just(AnchorSide::Left),
        Just(AnchorSide::Top),
        Just(AnchorSide::Right),
        Just(AnchorSide::Bottom),
    ];
    prop_oneof![
        4 => (side, 1i32..200, 0i32..3)
            .prop_map(|(side, size, z)| Child::Anchored { side, size, z }),
        1 => (0i32..3).prop_map(|z| Child::Fill { z }),
    ]
}

proptest! {
    #[test]
    fn layers_never_adjust_each_other(children in proptest::collection::vec(child(), 1..16)) {
        let (mut store, _) = store_with_root();
        let keys: Vec<SpaceKey> = children
            .iter()
            .map(|c| {
                let props = match *c {
                    Child::Anchored { side, size, z } => {
                        SpaceProps::anchored(side, size).z_index(z)
                    }
                    Child::Fill { z } => SpaceProps::fill().z_index(z),
                };
                store.register(Some("root"), props).unwrap()
            })
            .collect();

        // Orders are assigned in registration order, so a plain scan over
        // the registration list reproduces each stack.
        let before = |idx: usize, side: AnchorSide, z: i32| -> f64 {
            children[..idx]
                .iter()
                .filter_map(|c| match *c {
                    Child::Anchored { side: s, size, z: cz } if s == side && cz == z => {
                        Some(f64::from(size))
                    }
                    _ => None,
                })
                .sum()
        };

        for (i, (c, key)) in children.iter().zip(&keys).enumerate() {
            let space = store.space(*key).unwrap();
            match *c {
                Child::Anchored { side, z, .. } => {
                    prop_assert_eq!(
                        pixels(space.expression(side.edge_field())),
                        before(i, side, z)
                    );
                }
                Child::Fill { z } => {
                    for side in AnchorSide::ALL {
                        prop_assert_eq!(
                            pixels(space.expression(side.edge_field())),
                            before(children.len(), side, z)
                        );
                    }
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Removal
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn removal_shifts_by_the_removed_size() {
    let (mut store, _) = store_with_root();
    let a = store.register(Some("root"), SpaceProps::anchored(AnchorSide::Top, 40)).unwrap();
    let b = store.register(Some("root"), SpaceProps::anchored(AnchorSide::Top, 25)).unwrap();
    let c = store.register(Some("root"), SpaceProps::anchored(AnchorSide::Top, 10)).unwrap();
    let fill = store.register(Some("root"), SpaceProps::fill()).unwrap();

    let top_before = pixels(store.space(c).unwrap().top());
    store.remove_space(b).unwrap();

    assert_eq!(pixels(store.space(c).unwrap().top()), top_before - 25.0);
    assert_eq!(css(&store, a, GeometryField::Top).as_deref(), Some("0px"));
    assert_eq!(css(&store, fill, GeometryField::Top).as_deref(), Some("calc(0px + 40px + 10px)"));
    assert!(store.sink().rule(store.space(c).unwrap().id()).is_some());
    assert!(store.get(b).is_none());
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Headless measurement
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn holy_grail_layout_resolves() {
    let (mut store, _) = store_with_root();
    let header = store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Top, 60))
        .unwrap();
    let nav = store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Left, "25%"))
        .unwrap();
    let aside = store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Right, 100))
        .unwrap();
    let footer = store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Bottom, 40))
        .unwrap();
    let main = store.register(Some("root"), SpaceProps::fill()).unwrap();

    let view = ComputedLayout::with_size(800.0, 600.0);
    let rect = |k| view.bounding_rect(&store, k).unwrap();

    assert_eq!(rect(header), DomRect::new(0.0, 0.0, 800.0, 60.0));
    assert_eq!(rect(nav), DomRect::new(0.0, 0.0, 200.0, 600.0));
    assert_eq!(rect(aside), DomRect::new(700.0, 0.0, 100.0, 600.0));
    assert_eq!(rect(footer), DomRect::new(0.0, 560.0, 800.0, 40.0));
    assert_eq!(rect(main), DomRect::new(200.0, 60.0, 500.0, 500.0));
}

#[test]
fn nested_spaces_resolve_inside_their_parent() {
    let (mut store, _) = store_with_root();
    store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Left, 300).id("side"))
        .unwrap();
    let toolbar = store
        .register(Some("side"), SpaceProps::anchored(AnchorSide::Top, 32))
        .unwrap();
    let list = store.register(Some("side"), SpaceProps::fill()).unwrap();

    let view = ComputedLayout::with_size(1024.0, 768.0);
    assert_eq!(view.bounding_rect(&store, toolbar), Some(DomRect::new(0.0, 0.0, 300.0, 32.0)));
    assert_eq!(view.bounding_rect(&store, list), Some(DomRect::new(0.0, 32.0, 300.0, 736.0)));
}

#[test]
fn fixed_root_sizes_its_children() {
    let mut store = SpaceStore::new();
    store
        .register(None, SpaceProps::fixed(Some(SizeUnit::px(400.0)), 300).id("panel"))
        .unwrap();
    let top = store
        .register(Some("panel"), SpaceProps::anchored(AnchorSide::Top, "10%"))
        .unwrap();

    let view = ComputedLayout::with_size(1920.0, 1080.0);
    assert_eq!(
        view.bounding_rect(&store, top),
        Some(DomRect::new(0.0, 0.0, 400.0, 30.0))
    );
    let rule = store.sink().rule("panel").unwrap();
    assert!(rule.starts_with("#panel { position: relative; width: 400px; height: 300px;"));
}
