use super::*;
use crate::backend::{BackendSelector, DeviceContext, GenericBackend, PredictionParams};
use crate::draw::color::{BLACK, RED, WHITE};
use crate::draw::surface::RasterSnapshot;
use crate::input::{InputRouter, RawAction, RawEvent, Sample, ToolType};

const INK: [u8; 4] = [0, 0, 0, 255];
const PAPER: [u8; 4] = [255, 255, 255, 255];

fn settings() -> CompositorSettings {
    CompositorSettings {
        base_width: 10.0,
        ..CompositorSettings::default()
    }
}

fn create_compositor() -> StrokeCompositor {
    StrokeCompositor::new(64, 64, settings()).unwrap()
}

fn generic_router() -> InputRouter {
    InputRouter::select(
        BackendSelector::new(vec![Box::new(GenericBackend::new())]),
        &DeviceContext::unknown(),
    )
}

fn vendor_router() -> InputRouter {
    InputRouter::select(
        BackendSelector::with_default_backends(PredictionParams::default()),
        &DeviceContext::new("OnePlus", "Pad"),
    )
}

fn event(action: RawAction, x: f32, y: f32, pressure: f32, tool: ToolType) -> RawEvent {
    RawEvent::new(action, x, y, pressure, tool)
}

/// Draws a horizontal stylus stroke at `y` through the router.
fn draw_line(router: &mut InputRouter, compositor: &mut StrokeCompositor, y: f32) {
    router.handle(
        &event(RawAction::Down, 8.0, y, 0.4, ToolType::Stylus),
        compositor,
    );
    router.handle(
        &event(RawAction::Move, 32.0, y, 0.4, ToolType::Stylus),
        compositor,
    );
    router.handle(
        &event(RawAction::Up, 56.0, y, 0.4, ToolType::Stylus),
        compositor,
    );
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-4
}

fn exported(compositor: &StrokeCompositor) -> RasterSnapshot {
    compositor.export_surface().unwrap()
}

#[test]
fn test_new_surface_is_background() {
    let compositor = create_compositor();
    let snapshot = exported(&compositor);
    assert_eq!(snapshot.width(), 64);
    assert_eq!(snapshot.height(), 64);
    assert_eq!(snapshot, RasterSnapshot::filled(64, 64, WHITE));
    assert!(!compositor.is_drawing());
    assert!(compositor.history().is_empty());
}

#[test]
fn test_stylus_stroke_commits_with_last_width() {
    let mut router = generic_router();
    let mut compositor = create_compositor();

    router.handle(
        &event(RawAction::Down, 10.0, 10.0, 0.2, ToolType::Stylus),
        &mut compositor,
    );
    assert!(compositor.is_drawing());
    assert!(approx(compositor.current_width(), 8.0));

    router.handle(
        &event(RawAction::Move, 20.0, 10.0, 0.4, ToolType::Stylus),
        &mut compositor,
    );
    assert!(approx(compositor.current_width(), 11.0));

    router.handle(
        &event(RawAction::Up, 30.0, 10.0, 0.9, ToolType::Stylus),
        &mut compositor,
    );

    assert!(!compositor.is_drawing());
    assert_eq!(compositor.history().len(), 1);
    let stroke = compositor.history().last().unwrap();
    assert_eq!(stroke.points(), &[(10.0, 10.0), (20.0, 10.0), (30.0, 10.0)]);
    assert!(approx(stroke.style().width, 11.0));
    assert_eq!(stroke.style().color, BLACK);
    assert_eq!(exported(&compositor).pixel(20, 10), Some(INK));
}

#[test]
fn test_finger_stroke_uses_neutral_pressure() {
    let mut router = generic_router();
    let mut compositor = create_compositor();

    for (action, x, pressure) in [
        (RawAction::Down, 10.0, 0.9),
        (RawAction::Move, 20.0, 0.1),
        (RawAction::Up, 30.0, 0.0),
    ] {
        router.handle(
            &event(action, x, 30.0, pressure, ToolType::Finger),
            &mut compositor,
        );
    }

    let stroke = compositor.history().last().unwrap();
    assert!(approx(stroke.style().width, 12.5));
}

#[test]
fn test_undo_matches_replay_of_remaining_strokes() {
    let mut router = generic_router();
    let mut compositor = create_compositor();
    for y in [10.0, 30.0, 50.0] {
        draw_line(&mut router, &mut compositor, y);
    }
    assert_eq!(exported(&compositor).pixel(32, 50), Some(INK));

    assert!(compositor.undo());
    assert_eq!(compositor.history().len(), 2);

    let mut reference = create_compositor();
    for y in [10.0, 30.0] {
        draw_line(&mut router, &mut reference, y);
    }

    let after_undo = exported(&compositor);
    assert_eq!(after_undo, exported(&reference));
    assert_eq!(after_undo.pixel(32, 50), Some(PAPER));
    assert_eq!(after_undo.pixel(32, 30), Some(INK));
}

#[test]
fn test_undo_with_empty_history_is_noop() {
    let mut compositor = create_compositor();
    let before = exported(&compositor);

    assert!(!compositor.undo());
    assert!(compositor.history().is_empty());
    assert_eq!(exported(&compositor), before);
}

#[test]
fn test_undo_keeps_original_colors() {
    let mut router = generic_router();
    let mut compositor = create_compositor();

    draw_line(&mut router, &mut compositor, 10.0);
    compositor.set_color(RED);
    draw_line(&mut router, &mut compositor, 30.0);
    draw_line(&mut router, &mut compositor, 50.0);

    compositor.undo();
    let snapshot = exported(&compositor);
    assert_eq!(snapshot.pixel(32, 10), Some(INK));
    assert_eq!(snapshot.pixel(32, 30), Some([255, 0, 0, 255]));
    assert_eq!(snapshot.pixel(32, 50), Some(PAPER));
}

#[test]
fn test_clear_resets_surface_and_history() {
    let mut router = generic_router();
    let mut compositor = create_compositor();
    draw_line(&mut router, &mut compositor, 20.0);

    compositor.clear();
    assert!(compositor.history().is_empty());
    assert_eq!(exported(&compositor), RasterSnapshot::filled(64, 64, WHITE));
    assert!(!compositor.undo());
}

#[test]
fn test_clear_abandons_active_stroke() {
    let mut compositor = create_compositor();
    compositor.on_stroke_begin(Sample::new(10.0, 10.0, 0.5, 0));
    compositor.on_stroke_continue(
        Sample::new(20.0, 10.0, 0.5, 1),
        &[Sample::new(30.0, 10.0, 0.5, 2)],
    );

    compositor.clear();
    assert!(!compositor.is_drawing());
    assert!(compositor.predicted().is_empty());

    compositor.on_stroke_end(Sample::new(30.0, 10.0, 0.5, 3));
    assert!(compositor.history().is_empty());
    assert_eq!(exported(&compositor), RasterSnapshot::filled(64, 64, WHITE));
}

#[test]
fn test_zero_length_stroke_leaves_a_dot() {
    let mut compositor = create_compositor();
    compositor.on_stroke_begin(Sample::new(20.0, 20.0, 0.5, 0));
    compositor.on_stroke_end(Sample::new(20.0, 20.0, 0.5, 1));

    assert_eq!(compositor.history().len(), 1);
    assert_eq!(exported(&compositor).pixel(20, 20), Some(INK));
}

#[test]
fn test_continue_and_end_while_idle_are_ignored() {
    let mut compositor = create_compositor();
    compositor.on_stroke_continue(Sample::new(5.0, 5.0, 0.5, 0), &[]);
    compositor.on_stroke_end(Sample::new(6.0, 6.0, 0.5, 1));

    assert!(!compositor.is_drawing());
    assert!(compositor.history().is_empty());
    assert_eq!(exported(&compositor), RasterSnapshot::filled(64, 64, WHITE));
}

#[test]
fn test_begin_mid_stroke_discards_unfinished_stroke() {
    let mut compositor = create_compositor();
    compositor.on_stroke_begin(Sample::new(5.0, 5.0, 0.5, 0));
    compositor.on_stroke_continue(Sample::new(15.0, 5.0, 0.5, 1), &[]);
    compositor.on_stroke_begin(Sample::new(40.0, 40.0, 0.5, 2));

    assert_eq!(compositor.active_points(), &[(40.0, 40.0)]);
    compositor.on_stroke_end(Sample::new(50.0, 40.0, 0.5, 3));
    assert_eq!(compositor.history().len(), 1);
    assert_eq!(exported(&compositor).pixel(10, 5), Some(PAPER));
}

#[test]
fn test_active_stroke_is_not_baked() {
    let mut compositor = create_compositor();
    compositor.on_stroke_begin(Sample::new(10.0, 32.0, 0.5, 0));
    compositor.on_stroke_continue(Sample::new(50.0, 32.0, 0.5, 1), &[]);

    assert_eq!(exported(&compositor).pixel(30, 32), Some(PAPER));
    assert_eq!(compositor.compose_snapshot().unwrap().pixel(30, 32), Some(INK));
}

#[test]
fn test_prediction_overlay_is_never_baked() {
    let mut router = vendor_router();
    assert_eq!(router.active_vendor(), "OPPO/OnePlus");
    let mut compositor = create_compositor();

    router.handle(
        &event(RawAction::Down, 10.0, 10.0, 0.5, ToolType::Stylus),
        &mut compositor,
    );
    router.handle(
        &event(RawAction::Move, 20.0, 10.0, 0.5, ToolType::Stylus),
        &mut compositor,
    );

    let predicted = compositor.predicted().to_vec();
    assert!(!predicted.is_empty());
    assert!(predicted.iter().all(|s| s.x > 20.0));

    // Tail beyond the live stroke's round cap shows as translucent ink.
    let frame = compositor.compose_snapshot().unwrap();
    let tail = frame.pixel(40, 10).unwrap();
    assert!(tail[0] > 100 && tail[0] < 200, "expected partial ink, got {tail:?}");

    router.handle(
        &event(RawAction::Up, 22.0, 10.0, 0.5, ToolType::Stylus),
        &mut compositor,
    );

    assert!(compositor.predicted().is_empty());
    assert_eq!(exported(&compositor).pixel(40, 10), Some(PAPER));
    assert_eq!(compositor.compose_snapshot().unwrap().pixel(40, 10), Some(PAPER));
}

#[test]
fn test_hidden_prediction_is_not_composed() {
    let mut compositor = create_compositor();
    compositor.set_show_prediction(false);
    compositor.on_stroke_begin(Sample::new(10.0, 10.0, 0.5, 0));
    compositor.on_stroke_continue(
        Sample::new(20.0, 10.0, 0.5, 1),
        &[Sample::new(40.0, 10.0, 0.5, 2)],
    );

    let frame = compositor.compose_snapshot().unwrap();
    assert_eq!(frame.pixel(36, 10), Some(PAPER));
}

#[test]
fn test_export_import_roundtrip() {
    let mut router = generic_router();
    let mut source = create_compositor();
    draw_line(&mut router, &mut source, 20.0);
    let snapshot = exported(&source);

    let mut target = create_compositor();
    target.import_surface(snapshot.clone()).unwrap();

    assert_eq!(exported(&target), snapshot);
    assert!(target.history().is_empty());
    assert!(target.has_base_layer());
}

#[test]
fn test_undo_never_removes_imported_content() {
    let mut router = generic_router();
    let mut source = create_compositor();
    draw_line(&mut router, &mut source, 20.0);
    let imported = exported(&source);

    let mut compositor = create_compositor();
    compositor.import_surface(imported.clone()).unwrap();
    assert!(!compositor.undo());
    assert_eq!(exported(&compositor), imported);

    draw_line(&mut router, &mut compositor, 50.0);
    assert!(compositor.undo());
    assert_eq!(exported(&compositor), imported);

    compositor.clear();
    assert!(!compositor.has_base_layer());
    assert_eq!(exported(&compositor), RasterSnapshot::filled(64, 64, WHITE));
}

#[test]
fn test_smaller_import_is_painted_at_origin() {
    let mut compositor = create_compositor();
    compositor
        .import_surface(RasterSnapshot::filled(8, 8, RED))
        .unwrap();

    let snapshot = exported(&compositor);
    assert_eq!(snapshot.pixel(4, 4), Some([255, 0, 0, 255]));
    assert_eq!(snapshot.pixel(20, 20), Some(PAPER));
}

#[test]
fn test_rejected_import_leaves_canvas_untouched() {
    let mut router = generic_router();
    let mut compositor = create_compositor();
    draw_line(&mut router, &mut compositor, 10.0);

    assert!(compositor.import_surface(RasterSnapshot::filled(0, 0, RED)).is_err());
    assert!(compositor.import_surface(RasterSnapshot::filled(16385, 1, RED)).is_err());
    assert!(!compositor.has_base_layer());
    assert_eq!(compositor.history().len(), 1);

    draw_line(&mut router, &mut compositor, 30.0);
    assert!(compositor.undo());
    let snapshot = exported(&compositor);
    assert_eq!(snapshot.pixel(32, 10), Some(INK));
    assert_eq!(snapshot.pixel(32, 30), Some(PAPER));
}

#[test]
fn test_resize_replays_history() {
    let mut router = generic_router();
    let mut compositor = create_compositor();
    draw_line(&mut router, &mut compositor, 20.0);

    compositor.resize(100, 80).unwrap();
    assert_eq!((compositor.width(), compositor.height()), (100, 80));
    assert_eq!(compositor.history().len(), 1);

    let snapshot = exported(&compositor);
    assert_eq!(snapshot.pixel(32, 20), Some(INK));
    assert_eq!(snapshot.pixel(90, 70), Some(PAPER));
}

#[test]
fn test_resize_during_stroke_is_deferred() {
    let mut compositor = create_compositor();
    compositor.on_stroke_begin(Sample::new(4.0, 4.0, 0.5, 0));
    compositor.resize(32, 32).unwrap();

    assert_eq!(compositor.width(), 64);
    assert_eq!(compositor.pending_resize(), Some((32, 32)));

    compositor.on_stroke_end(Sample::new(20.0, 4.0, 0.5, 1));
    assert_eq!((compositor.width(), compositor.height()), (32, 32));
    assert_eq!(compositor.pending_resize(), None);
    assert_eq!(compositor.history().len(), 1);
    assert_eq!(exported(&compositor).pixel(12, 4), Some(INK));
}

#[test]
fn test_resize_rejects_invalid_dimensions() {
    let mut compositor = create_compositor();
    assert!(compositor.resize(0, 10).is_err());
    assert_eq!(compositor.width(), 64);
}

#[test]
fn test_invalid_base_width_is_ignored() {
    let mut compositor = create_compositor();
    assert!(!compositor.set_base_width(0.0));
    assert!(!compositor.set_base_width(f64::NAN));
    assert_eq!(compositor.base_width(), 10.0);

    assert!(compositor.set_base_width(4.0));
    compositor.on_stroke_begin(Sample::new(10.0, 10.0, 0.0, 0));
    assert!(approx(compositor.current_width(), 2.0));
}

#[test]
fn test_commit_marks_stroke_region_dirty() {
    let mut compositor = create_compositor();
    compositor.take_dirty_regions();
    assert!(compositor.take_redraw());
    assert!(!compositor.needs_redraw());

    compositor.on_stroke_begin(Sample::new(10.0, 10.0, 0.5, 0));
    compositor.on_stroke_end(Sample::new(20.0, 10.0, 0.5, 1));

    let regions = compositor.take_dirty_regions();
    assert!(!regions.is_empty());
    for rect in &regions {
        assert!(rect.x >= 0 && rect.y >= 0);
        assert!(rect.x + rect.width <= 64 && rect.y + rect.height <= 64);
        assert!(rect.width < 64);
    }
    assert!(compositor.needs_redraw());
}

#[test]
fn test_undo_marks_full_surface_dirty() {
    let mut router = generic_router();
    let mut compositor = create_compositor();
    draw_line(&mut router, &mut compositor, 20.0);
    compositor.take_dirty_regions();

    compositor.undo();
    let regions = compositor.take_dirty_regions();
    assert_eq!(regions.len(), 1);
    assert_eq!((regions[0].width, regions[0].height), (64, 64));
}

#[test]
fn test_far_offscreen_stroke_is_committed() {
    let mut compositor = create_compositor();
    compositor.take_dirty_regions();

    compositor.on_stroke_begin(Sample::new(-3e9, 10.0, 0.5, 0));
    compositor.on_stroke_continue(Sample::new(3e9, 10.0, 0.5, 1), &[]);
    compositor.on_stroke_end(Sample::new(3e9, 10.0, 0.5, 2));

    compositor.on_stroke_begin(Sample::new(3e9, 3e9, 0.5, 3));
    compositor.on_stroke_end(Sample::new(3e9, 3e9, 0.5, 4));

    assert_eq!(compositor.history().len(), 2);
    assert_eq!(compositor.history().as_slice()[0].points()[0], (-3e9, 10.0));
    for rect in compositor.take_dirty_regions() {
        assert!(rect.x >= 0 && rect.y >= 0);
        assert!(rect.x + rect.width <= 64 && rect.y + rect.height <= 64);
    }

    assert!(compositor.undo());
    assert_eq!(compositor.history().len(), 1);
}
