//! Platform abstraction layer
//!
//! Input devices are bound outside the crate. A host implements
//! [`InputProvider`] over its keyboard/touch state and the game polls it once
//! per frame into a [`TickInput`] snapshot.

use crate::sim::TickInput;

/// Live input state queried once per frame
pub trait InputProvider {
    fn is_left(&self) -> bool;
    fn is_right(&self) -> bool;
    fn is_jump(&self) -> bool;
    fn is_transform(&self) -> bool;
    fn is_attack(&self) -> bool;
    fn is_start(&self) -> bool;
    fn is_restart(&self) -> bool;
}

impl TickInput {
    /// Snapshot the provider's current state
    pub fn poll(provider: &dyn InputProvider) -> Self {
        Self {
            left: provider.is_left(),
            right: provider.is_right(),
            jump: provider.is_jump(),
            transform: provider.is_transform(),
            attack: provider.is_attack(),
            start: provider.is_start(),
            restart: provider.is_restart(),
        }
    }
}

/// Held-key set for hosts that track keys themselves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub transform: bool,
    pub attack: bool,
    pub start: bool,
    pub restart: bool,
}

impl HeldKeys {
    /// Update from a key name (`ArrowLeft`, `Space`, `KeyR`, ...)
    ///
    /// Returns false for keys the game doesn't bind.
    pub fn set_key(&mut self, key: &str, down: bool) -> bool {
        let slot = match key {
            "ArrowLeft" | "KeyA" => &mut self.left,
            "ArrowRight" | "KeyD" => &mut self.right,
            "ArrowUp" | "Space" | "KeyW" => &mut self.jump,
            "KeyT" => &mut self.transform,
            "KeyF" => &mut self.attack,
            "Enter" => &mut self.start,
            "KeyR" => &mut self.restart,
            _ => return false,
        };
        *slot = down;
        true
    }
}

impl InputProvider for HeldKeys {
    fn is_left(&self) -> bool {
        self.left
    }

    fn is_right(&self) -> bool {
        self.right
    }

    fn is_jump(&self) -> bool {
        self.jump
    }

    fn is_transform(&self) -> bool {
        self.transform
    }

    fn is_attack(&self) -> bool {
        self.attack
    }

    fn is_start(&self) -> bool {
        self.start
    }

    fn is_restart(&self) -> bool {
        self.restart
    }
}
