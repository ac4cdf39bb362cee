//! Stroke capture driving a real raster surface.

use sketch_core::{
    CanvasRect, PointerEvent, PointerPhase, StrokeCapture, StrokeOutcome, TouchEvent, TouchPhase,
    TouchPoint,
};
use sketch_renderer::{decode_artifact, RasterSurface};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn drive(surface: &mut RasterSurface, capture: &mut StrokeCapture, events: &[PointerEvent]) {
    let canvas = CanvasRect::at_origin(600.0, 400.0);
    for event in events {
        capture.handle_event(Some(&mut *surface), event, Some(&canvas));
    }
}

#[test]
fn idle_moves_leave_canvas_untouched() {
    let mut surface = RasterSurface::with_defaults().expect("surface");
    let mut capture = StrokeCapture::new();
    let before = surface.to_rgba();

    drive(
        &mut surface,
        &mut capture,
        &[
            PointerEvent::mouse(PointerPhase::Move, 10.0, 10.0),
            PointerEvent::mouse(PointerPhase::Move, 300.0, 200.0),
            PointerEvent::mouse(PointerPhase::Up, 300.0, 200.0),
        ],
    );

    assert_eq!(surface.to_rgba(), before);
    assert_eq!(capture.segments_rendered(), 0);
}

#[test]
fn mouse_stroke_paints_its_path() {
    let mut surface = RasterSurface::with_defaults().expect("surface");
    let mut capture = StrokeCapture::new();

    drive(
        &mut surface,
        &mut capture,
        &[
            PointerEvent::mouse(PointerPhase::Down, 100.0, 100.0),
            PointerEvent::mouse(PointerPhase::Move, 200.0, 100.0),
            PointerEvent::mouse(PointerPhase::Move, 200.0, 200.0),
            PointerEvent::mouse(PointerPhase::Up, 200.0, 200.0),
            // Ignored after the stroke ended.
            PointerEvent::mouse(PointerPhase::Move, 500.0, 350.0),
        ],
    );

    assert_eq!(surface.pixel(150, 100), Some(WHITE));
    assert_eq!(surface.pixel(200, 150), Some(WHITE));
    assert_eq!(surface.pixel(450, 325), Some(BLACK));
    assert_eq!(capture.strokes_completed(), 1);
    assert!(!surface.is_path_open());
}

#[test]
fn leaving_the_canvas_ends_the_stroke() {
    let mut surface = RasterSurface::with_defaults().expect("surface");
    let mut capture = StrokeCapture::new();
    let canvas = CanvasRect::at_origin(600.0, 400.0);

    capture.handle_event(
        Some(&mut surface),
        &PointerEvent::mouse(PointerPhase::Down, 50.0, 50.0),
        Some(&canvas),
    );
    let outcome = capture.handle_event(
        Some(&mut surface),
        &PointerEvent::mouse(PointerPhase::Leave, 0.0, 0.0),
        Some(&canvas),
    );
    assert_eq!(outcome, StrokeOutcome::Ended);

    let outcome = capture.handle_event(
        Some(&mut surface),
        &PointerEvent::mouse(PointerPhase::Move, 60.0, 60.0),
        Some(&canvas),
    );
    assert_eq!(outcome, StrokeOutcome::Ignored);
}

#[test]
fn touch_and_mouse_strokes_render_identically() {
    let mut by_mouse = RasterSurface::with_defaults().expect("surface");
    let mut by_touch = RasterSurface::with_defaults().expect("surface");
    let canvas = CanvasRect::new(40.0, 25.0, 600.0, 400.0);

    let mut capture = StrokeCapture::new();
    for event in [
        PointerEvent::mouse(PointerPhase::Down, 10.0, 10.0),
        PointerEvent::mouse(PointerPhase::Move, 120.0, 80.0),
        PointerEvent::mouse(PointerPhase::Up, 120.0, 80.0),
    ] {
        capture.handle_event(Some(&mut by_mouse), &event, Some(&canvas));
    }

    let mut capture = StrokeCapture::new();
    let touch = |phase, x, y| {
        PointerEvent::touch(TouchEvent::new(phase, vec![TouchPoint::new(0, x, y)]))
    };
    for event in [
        touch(TouchPhase::Start, 50.0, 35.0),
        touch(TouchPhase::Move, 160.0, 105.0),
        PointerEvent::touch(TouchEvent::new(TouchPhase::End, Vec::new())),
    ] {
        capture.handle_event(Some(&mut by_touch), &event, Some(&canvas));
    }

    let mouse_pixels = decode_artifact(&by_mouse.serialize().expect("serialize")).expect("decode");
    let touch_pixels = decode_artifact(&by_touch.serialize().expect("serialize")).expect("decode");
    assert!(mouse_pixels.same_pixels(&touch_pixels));
}
