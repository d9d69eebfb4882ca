//! Keyboard controls
//!
//! Maps `KeyboardEvent.key` strings to game controls and folds key presses
//! into the tick input. Held controls follow key-down/key-up; one-shot
//! controls only fire on key-down.

use crate::sim::TickInput;

/// A game control bound to one or more keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Forward,
    Back,
    Jump,
    Pause,
    Restart,
}

impl Control {
    /// Look up the control for a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " => return Some(Control::Jump),
            "ArrowLeft" => return Some(Control::Left),
            "ArrowRight" => return Some(Control::Right),
            "ArrowUp" => return Some(Control::Forward),
            "ArrowDown" => return Some(Control::Back),
            "Escape" => return Some(Control::Pause),
            "Enter" => return Some(Control::Restart),
            _ => {}
        }
        match key.to_ascii_lowercase().as_str() {
            "a" => Some(Control::Left),
            "d" => Some(Control::Right),
            "w" => Some(Control::Forward),
            "s" => Some(Control::Back),
            "p" => Some(Control::Pause),
            "r" => Some(Control::Restart),
            _ => None,
        }
    }

    /// Whether the control stays active while the key is held
    pub fn is_held(self) -> bool {
        matches!(
            self,
            Control::Left | Control::Right | Control::Forward | Control::Back
        )
    }
}

impl TickInput {
    /// Apply a key-down
    pub fn press(&mut self, control: Control) {
        match control {
            Control::Left => self.left = true,
            Control::Right => self.right = true,
            Control::Forward => self.forward = true,
            Control::Back => self.back = true,
            Control::Jump => self.jump = true,
            Control::Pause => self.pause = true,
            Control::Restart => self.restart = true,
        }
    }

    /// Apply a key-up; one-shot controls ignore it
    pub fn release(&mut self, control: Control) {
        match control {
            Control::Left => self.left = false,
            Control::Right => self.right = false,
            Control::Forward => self.forward = false,
            Control::Back => self.back = false,
            Control::Jump | Control::Pause | Control::Restart => {}
        }
    }

    /// Drop every held control (e.g. on window blur, when key-ups are lost)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
        self.forward = false;
        self.back = false;
    }
}
