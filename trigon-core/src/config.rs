//! Trigger and handler configuration.
//!
//! These types deserialize from the JSON shape of a trigger definition:
//!
//! ```json
//! {
//!   "id": "orders",
//!   "settings": { "port": 8080 },
//!   "handlers": [{
//!     "name": "on_order",
//!     "settings": { "method": "POST" },
//!     "actions": [
//!       { "if": "$.priority", "input": { "id": "=$.order.id" } },
//!       { "output": { "status": "accepted" } }
//!     ]
//!   }]
//! }
//! ```

use crate::value::{Value, Values};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-action routing and mapping declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Guard expression source. Absent or blank means "always matches".
    ///
    /// A whitespace-only guard is never handed to the expression compiler;
    /// it is treated exactly like a missing one.
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Input mapping declaration.
    #[serde(default, skip_serializing_if = "Values::is_empty")]
    pub input: Values,
    /// Output mapping declaration.
    #[serde(default, skip_serializing_if = "Values::is_empty")]
    pub output: Values,
}

impl ActionConfig {
    /// An unconditional action with passthrough input and output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the guard expression.
    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Sets the input mapping declaration.
    pub fn input(mut self, input: Values) -> Self {
        self.input = input;
        self
    }

    /// Sets the output mapping declaration.
    pub fn output(mut self, output: Values) -> Self {
        self.output = output;
        self
    }

    /// The guard source, if one is set and not blank.
    pub fn guard(&self) -> Option<&str> {
        self.condition
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Configuration of one trigger handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Handler name.
    #[serde(default)]
    pub name: String,
    /// Handler-level settings.
    #[serde(default)]
    pub settings: Values,
    /// Ordered action declarations. Order decides which action wins.
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
    #[serde(skip)]
    parent: Option<Arc<Values>>,
}

impl HandlerConfig {
    /// A handler with no settings and no actions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a handler-level setting.
    pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }

    /// Appends an action declaration.
    pub fn with_action(mut self, action: ActionConfig) -> Self {
        self.actions.push(action);
        self
    }

    /// Links the settings of the trigger this handler belongs to.
    pub fn with_parent_settings(mut self, settings: Arc<Values>) -> Self {
        self.parent = Some(settings);
        self
    }

    /// The parent trigger's settings, if linked.
    pub fn parent_settings(&self) -> Option<&Values> {
        self.parent.as_deref()
    }

    /// Looks up a setting, falling back to the parent trigger's settings.
    pub fn setting(&self, name: &str) -> Option<&Value> {
        self.settings
            .get(name)
            .or_else(|| self.parent.as_deref().and_then(|p| p.get(name)))
    }
}

/// Configuration of a trigger and its handlers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Trigger identifier.
    #[serde(default)]
    pub id: String,
    /// Trigger-level settings, inherited by every handler.
    #[serde(default)]
    pub settings: Values,
    /// Handler configurations.
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

impl TriggerConfig {
    /// Parses a trigger definition and links its handlers to its settings.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(source)?;
        config.link_handlers();
        Ok(config)
    }

    /// Points every handler's parent settings at this trigger's settings.
    pub fn link_handlers(&mut self) {
        let settings = Arc::new(self.settings.clone());
        for handler in &mut self.handlers {
            handler.parent = Some(Arc::clone(&settings));
        }
    }

    /// Finds a handler by name.
    pub fn handler(&self, name: &str) -> Option<&HandlerConfig> {
        self.handlers.iter().find(|h| h.name == name)
    }
}
