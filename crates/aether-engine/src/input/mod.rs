//! Input subsystem.
//!
//! Public API does not expose winit types. `platform` translates window-system
//! events into `InputEvent`s which `InputState` folds into per-frame deltas.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
};
