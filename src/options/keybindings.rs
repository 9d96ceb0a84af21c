use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::input::KeyAction;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// Keyboard bindings for camera actions, keyed by `KeyboardEvent.code`.
pub struct KeybindingOptions {
    /// Maps action → key code (e.g. `ViewAll` → `"KeyF"`).
    pub bindings: HashMap<KeyAction, String>,
    #[serde(skip)]
    by_key: HashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        Self::from_bindings(HashMap::from([
            (KeyAction::ViewAll, "KeyF".to_owned()),
            (KeyAction::TwistClockwise, "KeyE".to_owned()),
            (KeyAction::TwistCounterClockwise, "KeyQ".to_owned()),
        ]))
    }
}

// Rebuilds the reverse map after loading, so a partial `[keybindings]`
// table never leaves lookups stale.
impl<'de> Deserialize<'de> for KeybindingOptions {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(default)]
        struct Raw {
            bindings: HashMap<KeyAction, String>,
        }
        impl Default for Raw {
            fn default() -> Self {
                Self {
                    bindings: KeybindingOptions::default().bindings,
                }
            }
        }
        Ok(Self::from_bindings(Raw::deserialize(d)?.bindings))
    }
}

impl KeybindingOptions {
    /// Bindings from an action → key map.
    #[must_use]
    pub fn from_bindings(bindings: HashMap<KeyAction, String>) -> Self {
        let by_key = bindings
            .iter()
            .map(|(action, key)| (key.clone(), *action))
            .collect();
        Self { bindings, by_key }
    }

    /// Bind `action` to `key`, replacing its previous key.
    pub fn bind(&mut self, action: KeyAction, key: impl Into<String>) {
        let mut bindings = std::mem::take(&mut self.bindings);
        let _ = bindings.insert(action, key.into());
        *self = Self::from_bindings(bindings);
    }

    /// Action bound to a key code.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.by_key.get(key).copied()
    }
}
