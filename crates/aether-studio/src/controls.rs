//! Keyboard control surface.
//!
//! Keys are decoded into [`Command`]s first, then applied to the store. Decoding
//! only looks at an [`InputFrame`], so bindings are testable without a window.

use aether_engine::input::{InputFrame, InputState, Key};
use aether_paint::{StrokeStore, Style};
use glam::{Vec3, Vec4};

use crate::camera::Movement;
use crate::config::StudioConfig;

/// A store or brush edit requested from the keyboard.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Command {
    Undo,
    Redo,
    Clear,
    SmoothCurrent,
    RemoveLastPoint,
    ScaleCurrent(f32),
    TranslateCurrent(Vec3),
    DuplicateLast,
    MergeAll,
    ClearRedo,
    ReverseCurrent,
    SelectStyle(Style),
    CycleStyle,
    AdjustSize(f32),
    CyclePalette,
    Exit,
}

/// Which transition fires a binding.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Trigger {
    Press,
    /// Press or key-repeat; used for incremental edits.
    Repeat,
}

/// Decodes key transitions into commands using the configured steps.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(Key, Trigger, Command)>,
}

impl KeyBindings {
    pub fn new(config: &StudioConfig) -> Self {
        let scale = config.scale_step;
        let step = config.translate_step;
        let size = config.size_step;

        let mut bindings = vec![
            (Key::Z, Trigger::Press, Command::Undo),
            (Key::Y, Trigger::Press, Command::Redo),
            (Key::Delete, Trigger::Press, Command::Clear),
            (Key::F, Trigger::Press, Command::SmoothCurrent),
            (Key::Backspace, Trigger::Repeat, Command::RemoveLastPoint),
            (Key::PageUp, Trigger::Repeat, Command::ScaleCurrent(scale)),
            (Key::PageDown, Trigger::Repeat, Command::ScaleCurrent(1.0 / scale)),
            (Key::ArrowLeft, Trigger::Repeat, Command::TranslateCurrent(Vec3::new(-step, 0.0, 0.0))),
            (Key::ArrowRight, Trigger::Repeat, Command::TranslateCurrent(Vec3::new(step, 0.0, 0.0))),
            (Key::ArrowUp, Trigger::Repeat, Command::TranslateCurrent(Vec3::new(0.0, step, 0.0))),
            (Key::ArrowDown, Trigger::Repeat, Command::TranslateCurrent(Vec3::new(0.0, -step, 0.0))),
            (Key::G, Trigger::Press, Command::DuplicateLast),
            (Key::M, Trigger::Press, Command::MergeAll),
            (Key::X, Trigger::Press, Command::ClearRedo),
            (Key::R, Trigger::Press, Command::ReverseCurrent),
            (Key::Q, Trigger::Press, Command::CycleStyle),
            (Key::Home, Trigger::Repeat, Command::AdjustSize(size)),
            (Key::End, Trigger::Repeat, Command::AdjustSize(-size)),
            (Key::C, Trigger::Press, Command::CyclePalette),
            (Key::Escape, Trigger::Press, Command::Exit),
        ];

        let digits = [Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4, Key::Digit5];
        for (key, style) in digits.into_iter().zip(Style::ALL) {
            bindings.push((key, Trigger::Press, Command::SelectStyle(style)));
        }

        Self { bindings }
    }

    /// Commands for this frame, in binding order.
    pub fn decode(&self, frame: &InputFrame) -> Vec<Command> {
        self.bindings
            .iter()
            .filter(|(key, trigger, _)| match trigger {
                Trigger::Press => frame.key_pressed(*key),
                Trigger::Repeat => frame.key_pressed_or_repeated(*key),
            })
            .map(|(_, _, cmd)| *cmd)
            .collect()
    }
}

/// Fly-camera movement from held keys: WASD plus Space/Shift for up/down.
pub fn movement(input: &InputState) -> Movement {
    let axis = |pos: Key, neg: Key| {
        f32::from(u8::from(input.key_down(pos))) - f32::from(u8::from(input.key_down(neg)))
    };
    Movement {
        forward: axis(Key::W, Key::S),
        right: axis(Key::D, Key::A),
        up: axis(Key::Space, Key::Shift),
    }
}

/// Brush color cycling.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Vec4>,
    index: usize,
}

impl Palette {
    pub fn new(colors: Vec<Vec4>) -> Self {
        Self { colors, index: 0 }
    }

    pub fn current(&self) -> Option<Vec4> {
        self.colors.get(self.index).copied()
    }

    /// Advances to the next color, wrapping around.
    pub fn advance(&mut self) -> Option<Vec4> {
        if self.colors.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.colors.len();
        self.current()
    }
}

/// Applies `cmd` to the store. Returns `false` when the command asks to exit.
pub fn apply(cmd: Command, store: &mut StrokeStore, palette: &mut Palette) -> bool {
    match cmd {
        Command::Undo => {
            if !store.undo() {
                log::debug!("undo: nothing to undo");
            }
        }
        Command::Redo => {
            if !store.redo() {
                log::debug!("redo: nothing to redo");
            }
        }
        Command::Clear => store.clear(),
        Command::SmoothCurrent => store.smooth_current(),
        Command::RemoveLastPoint => store.remove_last_point(),
        Command::ScaleCurrent(factor) => store.scale_current(factor),
        Command::TranslateCurrent(offset) => store.translate_current(offset),
        Command::DuplicateLast => {
            store.duplicate_last();
        }
        Command::MergeAll => {
            if !store.merge_all() {
                log::debug!("merge: need at least two strokes");
            }
        }
        Command::ClearRedo => store.clear_redo(),
        Command::ReverseCurrent => store.reverse_current(),
        Command::SelectStyle(style) => store.set_style(style),
        Command::CycleStyle => store.set_style(store.style().next()),
        Command::AdjustSize(delta) => {
            let size = store.brush().size + delta;
            store.brush_mut().set_size(size);
        }
        Command::CyclePalette => {
            if let Some(color) = palette.advance() {
                store.brush_mut().set_color(color);
            }
        }
        Command::Exit => {
            log::info!("exit requested");
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_paint::brush::MAX_BRUSH_SIZE;

    fn pressed(keys: &[Key]) -> InputFrame {
        let mut frame = InputFrame::default();
        frame.keys_pressed.extend(keys.iter().copied());
        frame
    }

    fn bindings() -> KeyBindings {
        KeyBindings::new(&StudioConfig::default())
    }

    // ── decoding ─────────────────────────────────────────────────────────

    #[test]
    fn nothing_pressed_decodes_nothing() {
        assert!(bindings().decode(&InputFrame::default()).is_empty());
    }

    #[test]
    fn decode_follows_binding_order() {
        let cmds = bindings().decode(&pressed(&[Key::M, Key::Z, Key::Escape]));
        assert_eq!(cmds, vec![Command::Undo, Command::MergeAll, Command::Exit]);
    }

    #[test]
    fn digits_select_styles() {
        let b = bindings();
        assert_eq!(b.decode(&pressed(&[Key::Digit1])), vec![Command::SelectStyle(Style::Freehand)]);
        assert_eq!(b.decode(&pressed(&[Key::Digit5])), vec![Command::SelectStyle(Style::Tube)]);
        assert!(b.decode(&pressed(&[Key::Digit6])).is_empty());
    }

    #[test]
    fn repeats_only_drive_incremental_edits() {
        let mut frame = InputFrame::default();
        frame.keys_repeated.extend([Key::PageUp, Key::Z]);
        assert_eq!(bindings().decode(&frame), vec![Command::ScaleCurrent(1.1)]);
    }

    #[test]
    fn steps_come_from_config() {
        let cfg = StudioConfig {
            translate_step: 0.5,
            ..StudioConfig::default()
        };
        let cmds = KeyBindings::new(&cfg).decode(&pressed(&[Key::ArrowDown]));
        assert_eq!(cmds, vec![Command::TranslateCurrent(Vec3::new(0.0, -0.5, 0.0))]);
    }

    // ── applying ─────────────────────────────────────────────────────────

    #[test]
    fn undo_redo_through_commands() {
        let mut store = StrokeStore::default();
        let mut palette = Palette::new(StudioConfig::default().palette);
        store.add_point(Vec3::ZERO);
        store.add_point(Vec3::X);
        store.end_stroke();

        assert!(apply(Command::Undo, &mut store, &mut palette));
        assert_eq!(store.stroke_count(), 0);
        assert!(apply(Command::Redo, &mut store, &mut palette));
        assert_eq!(store.stroke_count(), 1);
        assert!(apply(Command::Undo, &mut store, &mut palette));
        assert!(apply(Command::ClearRedo, &mut store, &mut palette));
        assert!(apply(Command::Redo, &mut store, &mut palette));
        assert_eq!(store.stroke_count(), 0);
    }

    #[test]
    fn cycle_style_wraps_through_all_styles() {
        let mut store = StrokeStore::default();
        let mut palette = Palette::new(Vec::new());
        assert_eq!(bindings().decode(&pressed(&[Key::Q])), vec![Command::CycleStyle]);

        let mut seen = Vec::new();
        for _ in 0..Style::ALL.len() {
            apply(Command::CycleStyle, &mut store, &mut palette);
            seen.push(store.style());
        }
        assert_eq!(seen.first(), Some(&Style::Points));
        assert_eq!(seen.last(), Some(&Style::Freehand));
    }

    #[test]
    fn size_adjustment_is_clamped() {
        let mut store = StrokeStore::default();
        let mut palette = Palette::new(Vec::new());
        for _ in 0..20 {
            apply(Command::AdjustSize(1.0), &mut store, &mut palette);
        }
        assert_eq!(store.brush().size, MAX_BRUSH_SIZE);
    }

    #[test]
    fn palette_cycles_brush_color() {
        let colors = vec![Vec4::ONE, Vec4::new(1.0, 0.0, 0.0, 1.0)];
        let mut store = StrokeStore::default();
        let mut palette = Palette::new(colors.clone());

        apply(Command::CyclePalette, &mut store, &mut palette);
        assert_eq!(store.brush().material.diffuse, colors[1]);
        apply(Command::CyclePalette, &mut store, &mut palette);
        assert_eq!(store.brush().material.diffuse, colors[0]);
    }

    #[test]
    fn empty_palette_is_inert() {
        let mut palette = Palette::new(Vec::new());
        assert_eq!(palette.advance(), None);
        assert_eq!(palette.current(), None);
    }

    #[test]
    fn exit_returns_false() {
        let mut store = StrokeStore::default();
        let mut palette = Palette::new(Vec::new());
        assert!(!apply(Command::Exit, &mut store, &mut palette));
    }

    #[test]
    fn movement_from_held_keys() {
        let mut input = InputState::default();
        input.keys_down.extend([Key::W, Key::A, Key::Shift]);
        let m = movement(&input);
        assert_eq!(m, Movement { forward: 1.0, right: -1.0, up: -1.0 });

        input.keys_down.insert(Key::S);
        assert_eq!(movement(&input).forward, 0.0);
    }
}
