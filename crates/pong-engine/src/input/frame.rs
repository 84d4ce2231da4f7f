use std::collections::HashSet;

use super::types::Key;

/// Per-frame input transitions.
///
/// Cleared by the runtime after each `on_frame` call, so "just pressed" is
/// scoped to exactly one frame regardless of event timing.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
}

impl InputFrame {
    #[inline]
    pub fn just_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    #[inline]
    pub fn just_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    /// Clears all per-frame transition sets.
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }
}
