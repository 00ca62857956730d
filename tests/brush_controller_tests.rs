use brush_chart::interaction::{BrushConfig, BrushController, CursorHint, DragMode};
use proptest::prelude::*;

fn config() -> BrushConfig {
    BrushConfig {
        control_border_width: 5.0,
        min_panel_width: 20.0,
    }
}

#[test]
fn initial_panel_is_clamped_into_strip() {
    let brush = BrushController::new(config(), 200.0, 180.0, 50.0);
    let state = brush.state();
    assert_eq!(state.panel_x, 150.0);
    assert_eq!(state.panel_width, 50.0);

    let tiny = BrushController::new(config(), 200.0, -10.0, 1.0);
    assert_eq!(tiny.state().panel_x, 0.0);
    assert_eq!(tiny.state().panel_width, 20.0);
}

#[test]
fn strip_narrower_than_minimum_is_selected_whole() {
    let brush = BrushController::new(config(), 12.0, 3.0, 4.0);
    let state = brush.state();
    assert_eq!(state.panel_x, 0.0);
    assert_eq!(state.panel_width, 12.0);
}

#[test]
fn gesture_lifecycle_returns_to_idle() {
    let mut brush = BrushController::new(config(), 400.0, 100.0, 100.0);

    assert!(brush.pointer_down(150.0));
    assert_eq!(brush.state().drag_mode, DragMode::Moving);
    assert_eq!(brush.state().drag_anchor, Some(150.0));
    assert!(!brush.pointer_down(160.0), "second pointer-down is ignored mid-drag");

    let moved = brush.pointer_move(170.0).expect("panel moved");
    assert_eq!(moved.panel_x, 120.0);

    let committed = brush.pointer_up(180.0).expect("gesture committed");
    assert_eq!(committed.panel_x, 130.0);
    assert_eq!(committed.drag_mode, DragMode::Idle);
    assert_eq!(brush.hover_hint(400.0), CursorHint::Default);
}

#[test]
fn move_reports_none_when_geometry_is_unchanged() {
    let mut brush = BrushController::new(config(), 400.0, 0.0, 100.0);
    assert!(brush.pointer_down(50.0));
    assert!(brush.pointer_move(-30.0).is_none());
}

#[test]
fn resize_from_narrow_panel_prefers_nearest_edge() {
    let wide_border = BrushConfig {
        control_border_width: 12.0,
        ..config()
    };
    let mut brush = BrushController::new(wide_border, 400.0, 100.0, 20.0);
    assert_eq!(brush.hit_test(106.0), DragMode::ResizingLeft);
    assert_eq!(brush.hit_test(116.0), DragMode::ResizingRight);

    assert!(brush.pointer_down(116.0));
    let state = brush.pointer_move(200.0).expect("resized");
    assert_eq!(state.panel_x, 100.0);
    assert_eq!(state.panel_width, 104.0);
}

proptest! {
    #[test]
    fn resize_never_breaks_panel_invariants(
        preview_width in 40.0f64..2_000.0,
        start_factor in 0.0f64..=1.0,
        width_factor in 0.0f64..=1.0,
        grab_right in any::<bool>(),
        moves in prop::collection::vec(-5_000.0f64..5_000.0, 1..12)
    ) {
        let min_width = config().min_panel_width;
        let width = min_width + width_factor * (preview_width - min_width);
        let x = start_factor * (preview_width - width);
        let mut brush = BrushController::new(config(), preview_width, x, width);

        let state = brush.state();
        let edge = if grab_right { state.right_edge() } else { state.panel_x };
        prop_assert!(brush.pointer_down(edge));

        for pointer_x in moves {
            brush.pointer_move(pointer_x);
            let state = brush.state();
            prop_assert!(state.panel_x >= 0.0);
            prop_assert!(state.panel_width >= min_width - 1e-9);
            prop_assert!(state.right_edge() <= preview_width + 1e-9);
        }

        let state = brush.pointer_up(edge).expect("commit");
        prop_assert!(state.panel_x >= 0.0);
        prop_assert!(state.panel_width >= min_width - 1e-9);
        prop_assert!(state.right_edge() <= preview_width + 1e-9);
    }

    #[test]
    fn moving_preserves_width(
        preview_width in 40.0f64..2_000.0,
        start_factor in 0.0f64..=1.0,
        moves in prop::collection::vec(-5_000.0f64..5_000.0, 1..12)
    ) {
        let requested = preview_width / 4.0;
        let x = start_factor * (preview_width - requested);
        let mut brush = BrushController::new(config(), preview_width, x, requested);
        let width = brush.state().panel_width;
        let grab = brush.state().panel_x + width / 2.0;
        prop_assume!(brush.hit_test(grab) == DragMode::Moving);
        prop_assert!(brush.pointer_down(grab));

        for pointer_x in moves {
            brush.pointer_move(pointer_x);
            let state = brush.state();
            prop_assert!((state.panel_width - width).abs() <= 1e-9);
            prop_assert!(state.panel_x >= 0.0);
            prop_assert!(state.right_edge() <= preview_width + 1e-9);
        }
    }
}
