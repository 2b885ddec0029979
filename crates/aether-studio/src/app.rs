use aether_engine::core::{App, AppControl, FrameCtx};
use aether_engine::input::{InputFrame, MouseButton};
use aether_engine::render::{CameraParams, StrokeRenderer};
use aether_paint::StrokeStore;
use glam::Vec2;

use crate::camera::FlyCamera;
use crate::config::StudioConfig;
use crate::controls::{self, KeyBindings, Palette};
use crate::picking::screen_to_world;

/// The painting application: one store, one camera, one renderer.
pub struct StudioApp {
    store: StrokeStore,
    renderer: StrokeRenderer,
    camera: FlyCamera,
    bindings: KeyBindings,
    palette: Palette,
    config: StudioConfig,
    title: String,
}

impl StudioApp {
    pub fn new(config: StudioConfig) -> Self {
        let mut store = StrokeStore::new(config.geometry);
        let palette = Palette::new(config.palette.clone());
        if let Some(color) = palette.current() {
            store.brush_mut().set_color(color);
        }

        Self {
            store,
            renderer: StrokeRenderer::new(config.renderer),
            camera: FlyCamera::new(config.camera),
            bindings: KeyBindings::new(&config),
            palette,
            title: String::new(),
            config,
        }
    }

    /// Runs this frame's key commands. Returns `false` on exit.
    fn handle_keys(&mut self, frame: &InputFrame) -> bool {
        for cmd in self.bindings.decode(frame) {
            if !controls::apply(cmd, &mut self.store, &mut self.palette) {
                return false;
            }
        }
        true
    }

    /// Feeds the left button into the store.
    ///
    /// While held, the cursor is projected onto the picking plane and appended
    /// once it has moved far enough from the previous point. Release closes the stroke.
    fn paint(&mut self, cursor: Option<Vec2>, viewport: Vec2, held: bool, released: bool) {
        if held {
            if let Some(cursor) = cursor {
                let point =
                    screen_to_world(cursor, viewport, &self.camera, self.config.pick_distance);
                let far_enough = self
                    .store
                    .current()
                    .and_then(|s| s.last_point())
                    .is_none_or(|last| last.distance(point) > self.config.min_point_spacing);
                if far_enough {
                    self.store.add_point(point);
                }
            }
        }

        if released {
            self.store.end_stroke();
        }
    }

    fn status_line(&self) -> String {
        let brush = self.store.brush();
        format!(
            "{} | {} | size {:.0} | strokes {} | redo {}",
            self.config.window.title,
            brush.style,
            brush.size,
            self.store.stroke_count(),
            self.store.redo_count(),
        )
    }
}

impl App for StudioApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let dt = ctx.time.dt;

        if ctx.input.button_down(MouseButton::Right) {
            let (dx, dy) = ctx.input_frame.pointer_delta;
            self.camera.look(dx, dy);
        }
        self.camera.advance(controls::movement(ctx.input), dt);

        if !self.handle_keys(ctx.input_frame) {
            return AppControl::Exit;
        }

        let (w, h) = ctx.window.physical_size();
        let cursor = ctx.input.pointer_pos.map(|(x, y)| Vec2::new(x, y));
        self.paint(
            cursor,
            Vec2::new(w as f32, h as f32),
            ctx.input.button_down(MouseButton::Left),
            ctx.input_frame.button_released(MouseButton::Left),
        );

        let status = self.status_line();
        if status != self.title {
            ctx.window.set_title(&status);
            self.title = status;
        }

        let renderer = &mut self.renderer;
        let store = &self.store;
        let camera = &self.camera;
        ctx.render(self.config.clear_color, |rctx, target| {
            let params = CameraParams {
                view: camera.view_matrix(),
                projection: camera.projection_matrix(rctx.aspect()),
                viewer_pos: camera.position,
            };
            renderer.draw(rctx, target, store, &params);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_engine::input::Key;
    use aether_paint::Style;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn app() -> StudioApp {
        StudioApp::new(StudioConfig::default())
    }

    fn drag(app: &mut StudioApp, cursors: &[Vec2]) {
        for c in cursors {
            app.paint(Some(*c), VIEWPORT, true, false);
        }
        app.paint(cursors.last().copied(), VIEWPORT, false, true);
    }

    // ── painting ─────────────────────────────────────────────────────────

    #[test]
    fn drag_commits_one_stroke() {
        let mut app = app();
        drag(
            &mut app,
            &[Vec2::new(100.0, 100.0), Vec2::new(200.0, 150.0), Vec2::new(300.0, 200.0)],
        );
        assert_eq!(app.store.stroke_count(), 1);
        assert_eq!(app.store.strokes()[0].len(), 3);
        assert!(!app.store.is_drawing());
    }

    #[test]
    fn stationary_cursor_adds_one_point() {
        let mut app = app();
        let c = Vec2::new(400.0, 300.0);
        for _ in 0..5 {
            app.paint(Some(c), VIEWPORT, true, false);
        }
        assert_eq!(app.store.current().map(|s| s.len()), Some(1));
    }

    #[test]
    fn click_without_drag_is_discarded() {
        let mut app = app();
        drag(&mut app, &[Vec2::new(10.0, 10.0)]);
        assert_eq!(app.store.stroke_count(), 0);
        assert!(!app.store.is_drawing());
    }

    #[test]
    fn cursor_outside_window_adds_nothing() {
        let mut app = app();
        app.paint(None, VIEWPORT, true, false);
        assert!(!app.store.is_drawing());
    }

    // ── keys and status ──────────────────────────────────────────────────

    #[test]
    fn starts_with_first_palette_color() {
        let cfg = StudioConfig::default();
        let first = cfg.palette[0];
        let app = StudioApp::new(cfg);
        assert_eq!(app.store.brush().material.diffuse, first);
    }

    #[test]
    fn escape_exits_and_stops_processing() {
        let mut app = app();
        let mut frame = InputFrame::default();
        frame.keys_pressed.extend([Key::Escape, Key::Digit3]);
        assert!(!app.handle_keys(&frame));
        assert_eq!(app.store.style(), Style::Freehand);
    }

    #[test]
    fn status_reflects_store() {
        let mut app = app();
        drag(&mut app, &[Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0)]);
        app.store.set_style(Style::Tube);
        assert_eq!(app.status_line(), "aether | Tube | size 2 | strokes 1 | redo 0");

        app.store.undo();
        assert!(app.status_line().ends_with("strokes 0 | redo 1"));
    }
}
