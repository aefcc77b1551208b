use std::sync::mpsc::Receiver;

use fractview_core::{FractalKind, Gesture, Precision, Vec2};
use fractview_render::{
    BuiltinFragments, Engine, EngineConfig, EngineEvent, EngineHandle, ProgramKey,
    RecordingDevice, RenderError, Uniform,
};

const WINDOW: Vec2<f32> = Vec2 { x: 800.0, y: 600.0 };
const DT: f32 = 1.0 / 60.0;

fn start() -> (Engine<u32>, EngineHandle, RecordingDevice) {
    let (engine, handle) = Engine::new(EngineConfig::default(), Box::new(BuiltinFragments));
    (engine, handle, RecordingDevice::new())
}

fn drain(rx: &Receiver<EngineEvent>) -> Vec<EngineEvent> {
    rx.try_iter().collect()
}

#[test]
fn first_frame_compiles_and_draws() {
    let (mut engine, _handle, mut device) = start();
    engine.frame(&mut device, DT, WINDOW).unwrap();

    assert_eq!(device.compile_count(), 1);
    assert_eq!(device.draw_count(), 1);
    assert_eq!(
        engine.composer().active_key(),
        Some(ProgramKey::new(FractalKind::Mandelbrot, Precision::Low))
    );

    // The standby program is prepared on the following frame.
    engine.frame(&mut device, DT, WINDOW).unwrap();
    assert_eq!(device.compile_count(), 2);
    assert_eq!(device.live_programs(), 2);
}

#[test]
fn center_zoom_scenario_through_handle() {
    let (mut engine, handle, mut device) = start();
    let events = handle.subscribe();
    engine.frame(&mut device, DT, WINDOW).unwrap();

    handle.send(Gesture::Zoom {
        scroll: 1.0,
        cursor: Vec2::new(400.0, 300.0),
    });
    for _ in 0..600 {
        engine.frame(&mut device, DT, WINDOW).unwrap();
    }

    let views: Vec<_> = drain(&events)
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::View(v) => Some(v),
            _ => None,
        })
        .collect();
    assert_eq!(views.len(), 601);
    let last = views.last().unwrap();
    assert!((last.side - 3.4 / 1.22).abs() < 1e-4);
    assert!(last.center[0].abs() < 1e-6 && last.center[1].abs() < 1e-6);

    // Side shrinks monotonically while animating.
    assert!(views.windows(2).all(|w| w[1].side <= w[0].side));
}

#[test]
fn rendered_bounds_follow_current_not_target() {
    let (mut engine, handle, mut device) = start();
    engine.frame(&mut device, DT, WINDOW).unwrap();

    handle.send(Gesture::Zoom {
        scroll: 1.0,
        cursor: Vec2::new(400.0, 300.0),
    });
    engine.frame(&mut device, DT, WINDOW).unwrap();

    let Some(Uniform::Float(maxy)) = device.uniform("maxy").cloned() else {
        panic!("maxy not uploaded as float");
    };
    // One tick in, the drawn half side lies strictly between start and target.
    assert!(maxy < 1.7);
    assert!(maxy > 1.7 / 1.22);
}

#[test]
fn precision_toggle_reuses_standby() {
    let (mut engine, handle, mut device) = start();
    engine.frame(&mut device, DT, WINDOW).unwrap();
    engine.frame(&mut device, DT, WINDOW).unwrap();
    let compiles = device.compile_count();

    handle.send(Gesture::SetPrecision(Precision::High));
    engine.frame(&mut device, DT, WINDOW).unwrap();
    assert!(matches!(device.uniform("minx"), Some(Uniform::Double(_))));

    handle.send(Gesture::SetPrecision(Precision::Low));
    engine.frame(&mut device, DT, WINDOW).unwrap();
    assert!(matches!(device.uniform("minx"), Some(Uniform::Float(_))));

    assert_eq!(device.compile_count(), compiles);
}

#[test]
fn compile_failure_is_reported_and_rendering_continues() {
    let (mut engine, handle, mut device) = start();
    let events = handle.subscribe();
    engine.frame(&mut device, DT, WINDOW).unwrap();
    let good = device.current_program();

    device.fail_when_contains = Some("iterateJulia".into());
    handle.send(Gesture::SetFractalKind(FractalKind::Julia));
    engine.frame(&mut device, DT, WINDOW).unwrap();

    let events = drain(&events);
    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::CompileFailed { kind: FractalKind::Julia, log, .. } if !log.is_empty()
    )));
    // The kind is reverted to what is actually on screen.
    assert!(events.contains(&EngineEvent::ProgramChanged {
        kind: FractalKind::Mandelbrot,
        precision: Precision::Low,
    }));
    assert_eq!(engine.controller().spec().kind, FractalKind::Mandelbrot);
    assert_eq!(device.current_program(), good);
    assert_eq!(device.draw_count(), 2);
}

#[test]
fn unknown_palette_keeps_previous() {
    let (mut engine, handle, mut device) = start();
    engine.frame(&mut device, DT, WINDOW).unwrap();

    handle.send(Gesture::SetPalette("Arctic Ice".into()));
    engine.frame(&mut device, DT, WINDOW).unwrap();
    assert_eq!(engine.palette_name(), "Arctic Ice");
    assert_eq!(device.uniform("palette_size"), Some(&Uniform::Int(10)));

    handle.send(Gesture::SetPalette("Does Not Exist".into()));
    engine.frame(&mut device, DT, WINDOW).unwrap();
    assert_eq!(engine.palette_name(), "Arctic Ice");
}

#[test]
fn julia_seed_changes_are_published() {
    let (mut engine, handle, mut device) = start();
    let events = handle.subscribe();
    handle.send(Gesture::SetFractalKind(FractalKind::Julia));
    engine.frame(&mut device, DT, WINDOW).unwrap();

    handle.send(Gesture::PointerMoved {
        delta: Vec2::new(10.0, 0.0),
    });
    engine.frame(&mut device, DT, WINDOW).unwrap();

    let seeds: Vec<_> = drain(&events)
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::Seed(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(seeds.len(), 1);
    assert!((seeds[0].value.x - (-0.7 + 10.0 * 1e-4)).abs() < 1e-12);
    assert!(matches!(device.uniform("juliaSeed"), Some(Uniform::Vec2(_))));
}

#[test]
fn dropped_subscribers_are_pruned() {
    let (mut engine, handle, mut device) = start();
    let keep = handle.subscribe();
    drop(handle.subscribe());
    engine.frame(&mut device, DT, WINDOW).unwrap();
    assert_eq!(engine.subscriber_count(), 1);
    assert!(!drain(&keep).is_empty());
}

#[test]
fn minimized_window_skips_drawing() {
    let (mut engine, _handle, mut device) = start();
    engine.frame(&mut device, DT, Vec2::new(0.0, 0.0)).unwrap();
    assert_eq!(device.draw_count(), 0);
    assert_eq!(device.compile_count(), 1);
}

#[test]
fn device_loss_propagates_and_shutdown_releases_everything() {
    let (mut engine, _handle, mut device) = start();
    engine.frame(&mut device, DT, WINDOW).unwrap();
    engine.frame(&mut device, DT, WINDOW).unwrap();

    device.lost = true;
    let err = engine.frame(&mut device, DT, WINDOW).unwrap_err();
    assert!(matches!(err, RenderError::DeviceLost));
    assert!(err.is_fatal());

    engine.shutdown(&mut device);
    assert_eq!(device.live_programs(), 0);
}

#[test]
fn handle_reports_stopped_engine() {
    let (engine, handle, _device) = start();
    drop(engine);
    assert!(!handle.send(Gesture::Reset));
}
