//! Resize and drag sessions driven end to end through the public API, with
//! [`ComputedLayout`] standing in for the browser.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use spacelayout::*;

const VIEW: ComputedLayout = ComputedLayout::with_size(1200.0, 900.0);

// ── Helpers ─────────────────────────────────────────────────────────────

fn unthrottled() -> SpaceStore {
    let mut store =
        SpaceStore::with_config(SpacesConfig::default().resize_throttle(Duration::ZERO));
    store.register(None, SpaceProps::viewport().id("root")).unwrap();
    store
}

fn drag_handle(
    store: &mut SpaceStore,
    key: SpaceKey,
    side: ResizeSide,
    from: (f64, f64),
    to: (f64, f64),
) -> Option<ResizeOutcome> {
    let mut session = start_resize(
        store,
        key,
        side,
        PointerEvent::at(from.0, from.1),
        PointerInput::Mouse,
        &VIEW,
    )
    .unwrap()
    .unwrap();
    session.pointer_move(store, PointerEvent::at(to.0, to.1)).unwrap();
    session.finish(store, &VIEW).unwrap()
}

// ═════════════════════════════════════════════════════════════════════════
// Resize
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn clamped_resize_stops_at_minimum() {
    let mut store = unthrottled();
    let key = store
        .register(
            Some("root"),
            SpaceProps::anchored(AnchorSide::Left, 100)
                .resizable(true)
                .minimum_size(50.0)
                .maximum_size(150.0),
        )
        .unwrap();
    let out = drag_handle(
        &mut store,
        key,
        ResizeSide::Right,
        (100.0, 0.0),
        (-100.0, 0.0),
    )
    .unwrap();
    assert_eq!(out.size, 50);
    assert_eq!(out.rect.width, 50.0);
}

#[test]
fn prop_size_change_discards_resize() {
    let mut store = unthrottled();
    let props = SpaceProps::anchored(AnchorSide::Left, 50).id("nav").resizable(true);
    let key = store.register(Some("root"), props.clone()).unwrap();
    drag_handle(&mut store, key, ResizeSide::Right, (50.0, 0.0), (150.0, 0.0));
    assert_eq!(
        store.space(key).unwrap().width().css().as_deref(),
        Some("calc(50px + 100px)")
    );

    store.update_space(key, &props.size(150)).unwrap();
    assert_eq!(store.space(key).unwrap().width().css().as_deref(), Some("150px"));
    assert!(store.sink().rule("nav").unwrap().contains("width: 150px;"));
}

#[test]
fn resize_restacks_later_siblings_every_tick() {
    let mut store = unthrottled();
    let first = store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Top, 40).resizable(true))
        .unwrap();
    let second = store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Top, 20))
        .unwrap();
    let fill = store.register(Some("root"), SpaceProps::fill()).unwrap();

    let mut session = start_resize(
        &mut store,
        first,
        ResizeSide::Bottom,
        PointerEvent::at(0.0, 40.0),
        PointerInput::Touch,
        &VIEW,
    )
    .unwrap()
    .unwrap();
    assert_eq!(session.input().move_event(), "touchmove");

    for y in [45.0, 50.0, 60.0] {
        session.pointer_move(&mut store, PointerEvent::at(0.0, y)).unwrap();
        let delta = y - 40.0;
        assert_eq!(
            VIEW.bounding_rect(&store, second).unwrap().top,
            40.0 + delta,
            "tick at y={y}"
        );
    }
    session.finish(&mut store, &VIEW).unwrap();

    assert_eq!(
        store.space(fill).unwrap().top().css().as_deref(),
        Some("calc(0px + 40px + 20px + 20px)")
    );
    assert_eq!(VIEW.bounding_rect(&store, fill).unwrap().top, 80.0);
}

#[test]
fn independent_spaces_resize_at_once() {
    let mut store = unthrottled();
    let left = store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Left, 100).resizable(true))
        .unwrap();
    let right = store
        .register(Some("root"), SpaceProps::anchored(AnchorSide::Right, 100).resizable(true))
        .unwrap();

    let mut a = start_resize(
        &mut store,
        left,
        ResizeSide::Right,
        PointerEvent::at(100.0, 0.0),
        PointerInput::Touch,
        &VIEW,
    )
    .unwrap()
    .unwrap();
    let mut b = start_resize(
        &mut store,
        right,
        ResizeSide::Left,
        PointerEvent::at(1100.0, 0.0),
        PointerInput::Touch,
        &VIEW,
    )
    .unwrap()
    .unwrap();
    a.pointer_move(&mut store, PointerEvent::at(130.0, 0.0)).unwrap();
    b.pointer_move(&mut store, PointerEvent::at(1000.0, 0.0)).unwrap();

    assert_eq!(b.finish(&mut store, &VIEW).unwrap().unwrap().size, 200);
    assert_eq!(a.finish(&mut store, &VIEW).unwrap().unwrap().size, 130);
}

#[test]
fn store_config_sets_default_minimum() {
    let mut store = SpaceStore::with_config(
        SpacesConfig::default()
            .resize_throttle(Duration::ZERO)
            .default_minimum_size(64.0),
    );
    store.register(None, SpaceProps::viewport().id("root")).unwrap();
    let props = SpaceProps::anchored(AnchorSide::Bottom, 200).resizable(true);
    let key = store.register(Some("root"), props).unwrap();
    let out = drag_handle(&mut store, key, ResizeSide::Top, (0.0, 700.0), (0.0, 899.0));
    let out = out.unwrap();
    assert_eq!(out.size, 64);
}

#[test]
fn touch_handle_size_reaches_the_strip_rule() {
    let mut store = SpaceStore::with_config(
        SpacesConfig::default().touch_enabled(true).touch_handle_size(12.0),
    );
    store.register(None, SpaceProps::viewport().id("root")).unwrap();
    let props = SpaceProps::anchored(AnchorSide::Left, 100).id("nav").resizable(true);
    store.register(Some("root"), props).unwrap();
    let strip = "#nav-mr { position: absolute; right: 0px; top: 0px; bottom: 0px; width: 12px;";
    assert!(store.sink().rule("nav").unwrap().contains(strip));
}

proptest! {
    #[test]
    fn resize_never_leaves_the_limits(
        start in 60i32..140,
        target in -400i32..1200,
    ) {
        let (start, target) = (f64::from(start), f64::from(target));
        let mut store = unthrottled();
        let key = store
            .register(
                Some("root"),
                SpaceProps::anchored(AnchorSide::Left, start)
                    .resizable(true)
                    .minimum_size(50.0)
                    .maximum_size(150.0),
            )
            .unwrap();
        let out = drag_handle(&mut store, key, ResizeSide::Right, (start, 0.0), (target, 0.0))
            .unwrap();
        prop_assert!(
            (50..=150).contains(&out.size),
            "size {} for target {}",
            out.size,
            target
        );
        prop_assert!((50.0..=150.0).contains(&out.rect.width));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Drag
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn drag_then_update_keeps_position_offset() {
    let mut store = unthrottled();
    let props = SpaceProps::positioned()
        .id("card")
        .left(20)
        .top(20)
        .width(200)
        .height(120);
    let key = store.register(Some("root"), props.clone()).unwrap();

    let down = PointerEvent::at(50.0, 50.0);
    let mut session = start_drag(&mut store, key, down, PointerInput::Mouse).unwrap();
    session.pointer_move(&mut store, PointerEvent::at(80.0, 90.0)).unwrap();
    let out = session.finish(&mut store, &VIEW).unwrap().unwrap();
    assert!(out.moved);
    assert_eq!(
        out.position,
        DragEndPosition {
            left: 50.0,
            top: 60.0,
            right: 250.0,
            bottom: 180.0,
            width: 200.0,
            height: 120.0,
        }
    );

    // Unrelated prop change leaves the drag offset alone.
    store.update_space(key, &props.z_index(3)).unwrap();
    assert_eq!(VIEW.bounding_rect(&store, key).unwrap().left, 50.0);
    assert!(store.sink().rule("card").unwrap().contains("left: calc(20px + 30px);"));
}

#[test]
fn wrapper_is_asked_to_rerender_after_gestures() {
    let mut store = unthrottled();
    let renders = Rc::new(Cell::new(0));
    let hook = {
        let renders = Rc::clone(&renders);
        Box::new(move || renders.set(renders.get() + 1)) as Box<dyn FnMut()>
    };
    let props = SpaceProps::positioned()
        .id("panel")
        .left(0)
        .top(0)
        .width(600)
        .height(600);
    let panel = store.create_space(Some("root"), props, Some(hook)).unwrap();
    store.add_space(panel).unwrap();
    let card = store
        .register(
            Some("panel"),
            SpaceProps::positioned()
                .left(0)
                .top(0)
                .width(100)
                .height(100)
                .resize_handles(&[ResizeSide::BottomRight]),
        )
        .unwrap();

    let ends = Rc::new(RefCell::new(Vec::new()));
    {
        let ends = Rc::clone(&ends);
        store.callbacks_mut(card).unwrap().on_drag_end =
            Some(Box::new(move |pos, moved| ends.borrow_mut().push((pos.left, moved))));
    }

    let down = PointerEvent::at(10.0, 10.0);
    let mut drag = start_drag(&mut store, card, down, PointerInput::Mouse).unwrap();
    drag.pointer_move(&mut store, PointerEvent::at(60.0, 10.0)).unwrap();
    drag.finish(&mut store, &VIEW).unwrap();

    let out = drag_handle(
        &mut store,
        card,
        ResizeSide::BottomRight,
        (150.0, 100.0),
        (170.0, 140.0),
    )
    .unwrap();
    assert_eq!((out.size, out.rect.height), (120, 140.0));

    assert_eq!(renders.get(), 2);
    assert_eq!(*ends.borrow(), [(50.0, true)]);
}

#[test]
fn resize_and_drag_exclude_each_other() {
    let mut store = unthrottled();
    let key = store
        .register(
            Some("root"),
            SpaceProps::positioned()
                .left(0)
                .top(0)
                .width(100)
                .height(100)
                .resize_handles(&[ResizeSide::Right]),
        )
        .unwrap();
    let down = PointerEvent::at(0.0, 0.0);
    let _drag = start_drag(&mut store, key, down, PointerInput::Mouse).unwrap();
    let err = start_resize(
        &mut store,
        key,
        ResizeSide::Right,
        PointerEvent::at(100.0, 0.0),
        PointerInput::Mouse,
        &VIEW,
    )
    .unwrap_err();
    let id = store.space(key).unwrap().id().into();
    assert_eq!(err, SpaceError::GestureInProgress { id });
}
