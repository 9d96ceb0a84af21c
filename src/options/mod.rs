//! Interaction configuration with TOML preset support.
//!
//! Every tunable the interaction core consults (drag thresholds, delays,
//! wheel behavior, tap timing, render timeout, key bindings) lives here.
//! The core reads options through [`ConfigProvider`] on each decision, so a
//! change takes effect on the next input event.

mod events;
mod interactions;
mod keybindings;
mod network;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

pub use events::EventOptions;
pub use interactions::InteractionOptions;
pub use keybindings::KeybindingOptions;
pub use network::NetworkOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[events]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Pointer, drag, and wheel behavior.
    pub interactions: InteractionOptions,
    /// Tap classification timing.
    pub events: EventOptions,
    /// Render request limits.
    pub network: NetworkOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, ViewerError> {
        toml::from_str(content)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(ViewerError::Io)
    }
}

/// Source of the current options.
pub trait ConfigProvider {
    /// Options in effect right now.
    fn options(&self) -> Options;
}

impl ConfigProvider for Options {
    fn options(&self) -> Options {
        self.clone()
    }
}

/// Shared, live-editable options.
impl ConfigProvider for Rc<RefCell<Options>> {
    fn options(&self) -> Options {
        self.borrow().clone()
    }
}
