use fractview_core::mapper::{aspect_ratio, fractal_to_screen, screen_to_fractal};
use fractview_core::{
    Axis, FractalKind, FractalSpec, Gesture, GestureController, GestureOutcome, Precision, Vec2,
    ViewConfig,
};

const WINDOW: Vec2<f32> = Vec2 { x: 800.0, y: 600.0 };

fn session() -> GestureController {
    let mut c = GestureController::new(ViewConfig::default(), FractalSpec::default());
    c.set_screen_size(WINDOW);
    c
}

fn settle(c: &mut GestureController) {
    for _ in 0..600 {
        c.tick(1.0 / 60.0);
    }
}

#[test]
fn zoom_then_settle_reaches_target() {
    let mut c = session();
    for _ in 0..5 {
        c.apply(Gesture::Zoom {
            scroll: 1.0,
            cursor: Vec2::new(200.0, 150.0),
        });
    }
    settle(&mut c);
    let cam = c.viewport().low();
    assert!(cam.remaining() < 1e-4);
    assert!((cam.side - 3.4 / 1.22f32.powi(5)).abs() < 1e-4);
    // Zooming toward the upper-left quadrant moves the center there.
    assert!(cam.center.x < 0.0 && cam.center.y > 0.0);
}

#[test]
fn deep_zoom_in_high_precision_keeps_distinct_pixels() {
    let mut c = session();
    c.apply(Gesture::SetPrecision(Precision::High));
    c.apply(Gesture::SetCenter {
        axis: Axis::X,
        text: "-0.743643887037151".into(),
    });
    c.apply(Gesture::SetCenter {
        axis: Axis::Y,
        text: "0.131825904205330".into(),
    });
    c.apply(Gesture::SetSide("1e-10".into()));
    settle(&mut c);

    let snap = c.viewport().snapshot();
    assert_eq!(snap.precision, Precision::High);
    assert_eq!(snap.side, 1e-10);
    assert!((snap.center[0] + 0.743643887037151).abs() < 1e-13);

    // Adjacent pixels still map to distinct plane points.
    let (center, side) = c.viewport().current_f64();
    let pixel = side / 600.0;
    assert!(center.x + pixel != center.x);
}

#[test]
fn precision_switch_during_animation_does_not_jump() {
    let mut c = session();
    c.apply(Gesture::Pan {
        delta: Vec2::new(-200.0, 0.0),
    });
    c.tick(1.0 / 60.0);
    let (before, side_before) = c.viewport().current_f64();

    assert_eq!(
        c.apply(Gesture::SetPrecision(Precision::High)),
        GestureOutcome::ProgramChanged
    );
    let (after, side_after) = c.viewport().current_f64();
    assert_eq!(before, after);
    assert_eq!(side_before, side_after);

    settle(&mut c);
    assert!((c.viewport().high().center.x - 0.85).abs() < 1e-6);
}

#[test]
fn julia_session_steers_seed_until_frozen() {
    let mut c = session();
    c.apply(Gesture::SetFractalKind(FractalKind::Julia));
    let start = c.seed().value;
    c.apply(Gesture::PointerMoved {
        delta: Vec2::new(0.0, -20.0),
    });
    let moved = c.seed().value;
    assert!(moved.y > start.y);

    c.apply(Gesture::ToggleSeedFreeze);
    c.apply(Gesture::PointerMoved {
        delta: Vec2::new(50.0, 50.0),
    });
    assert_eq!(c.seed().value, moved);
}

#[test]
fn restore_program_reverts_kind_and_precision() {
    let mut c = session();
    c.apply(Gesture::SetFractalKind(FractalKind::Julia));
    c.apply(Gesture::SetPrecision(Precision::High));
    c.restore_program(FractalKind::Mandelbrot, Precision::Low);
    assert_eq!(c.spec().kind, FractalKind::Mandelbrot);
    assert_eq!(c.viewport().precision(), Precision::Low);
}

#[test]
fn selected_rectangle_fills_window_on_fit_axis() {
    // (begin, end, fits by width)
    let cases = [
        (Vec2::<f32>::new(100.0, 100.0), Vec2::new(400.0, 200.0), true),
        (Vec2::new(650.0, 80.0), Vec2::new(500.0, 520.0), false),
    ];
    for (begin, end, by_width) in cases {
        let mut c = session();
        c.apply(Gesture::SetPrecision(Precision::High));
        c.apply(Gesture::Pan {
            delta: Vec2::new(37.0, -12.0),
        });
        settle(&mut c);

        let aspect = aspect_ratio(WINDOW) as f64;
        let bounds = c.viewport().high().bounds(aspect);
        let top_left = Vec2::new(begin.x.min(end.x), begin.y.min(end.y));
        let bottom_right = Vec2::new(begin.x.max(end.x), begin.y.max(end.y));
        let lo = screen_to_fractal(Vec2::new(top_left.x, bottom_right.y), WINDOW, &bounds);
        let hi = screen_to_fractal(Vec2::new(bottom_right.x, top_left.y), WINDOW, &bounds);

        c.apply(Gesture::BeginSelect(begin));
        c.apply(Gesture::UpdateSelect(end));
        assert_eq!(c.apply(Gesture::CommitSelect), GestureOutcome::Applied);
        settle(&mut c);

        let zoomed = c.viewport().high().bounds(aspect);
        let lo_px = fractal_to_screen(lo, WINDOW, &zoomed);
        let hi_px = fractal_to_screen(hi, WINDOW, &zoomed);
        let width = hi_px.x - lo_px.x;
        let height = lo_px.y - hi_px.y;

        if by_width {
            assert!((width - 800.0).abs() < 1e-6, "width {width}");
            assert!(height < 600.0);
        } else {
            assert!((height - 600.0).abs() < 1e-6, "height {height}");
            assert!(width < 800.0);
        }
        // The selection ends up centered.
        assert!(((lo_px.x + hi_px.x) / 2.0 - 400.0).abs() < 1e-6);
        assert!(((lo_px.y + hi_px.y) / 2.0 - 300.0).abs() < 1e-6);
    }
}
