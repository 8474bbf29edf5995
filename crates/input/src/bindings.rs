use crate::state::InputState;
use crate::symbols;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps host key names to simulation symbols.
///
/// The simulation never sees physical keys; a host translates its own key
/// events through a binding table. Unbound keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBindings {
    pub keys: BTreeMap<String, String>,
}

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, key: impl Into<String>, symbol: impl Into<String>) -> Self {
        self.keys.insert(key.into(), symbol.into());
        self
    }

    /// WASD and arrow keys drive the player.
    pub fn driving() -> Self {
        Self::new()
            .bind("w", symbols::FORWARD)
            .bind("arrow_up", symbols::FORWARD)
            .bind("s", symbols::BACKWARD)
            .bind("arrow_down", symbols::BACKWARD)
            .bind("a", symbols::TURN_LEFT)
            .bind("arrow_left", symbols::TURN_LEFT)
            .bind("d", symbols::TURN_RIGHT)
            .bind("arrow_right", symbols::TURN_RIGHT)
    }

    /// WASD flies the camera.
    pub fn free_fly() -> Self {
        Self::new()
            .bind("w", symbols::FLY_FORWARD)
            .bind("s", symbols::FLY_BACKWARD)
            .bind("a", symbols::FLY_LEFT)
            .bind("d", symbols::FLY_RIGHT)
    }

    pub fn symbol_for(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }

    /// Apply a host key event. Returns false when the key is unbound.
    pub fn apply_key(&self, input: &mut InputState, key: &str, pressed: bool) -> bool {
        match self.symbol_for(key) {
            Some(symbol) => {
                input.set(symbol, pressed);
                true
            }
            None => {
                tracing::trace!(key, "unbound key");
                false
            }
        }
    }
}
