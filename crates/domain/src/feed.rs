//! Live feed contract of the House-App page script.
//!
//! The page listens for `new_data` events on the real-time channel and
//! appends one text line per event to its content container.

use serde::{Deserialize, Serialize};

/// Event name the page subscribes to.
pub const NEW_DATA_EVENT: &str = "new_data";

/// Prefix of every rendered line.
pub const LINE_PREFIX: &str = "Nuevo dato: ";

/// Text shown when the page's action button is clicked.
pub const ACTION_ACKNOWLEDGEMENT: &str = "¡Hola desde el botón! 🎉";

/// One event received from the real-time channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEvent {
    /// Event name
    pub name: String,
    /// Arbitrary JSON payload
    pub payload: serde_json::Value,
}

impl FeedEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Renders the line appended for this event.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{LINE_PREFIX}{}", self.payload)
    }
}

/// Ordered lines rendered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveFeed {
    lines: Vec<String>,
}

impl LiveFeed {
    /// Creates an empty feed.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Appends the rendered line for a `new_data` event.
    ///
    /// Returns false and leaves the feed unchanged for other events.
    pub fn push(&mut self, event: &FeedEvent) -> bool {
        if event.name != NEW_DATA_EVENT {
            return false;
        }
        tracing::debug!(payload = %event.payload, "live feed event received");
        self.lines.push(event.render());
        true
    }

    /// Rendered lines, oldest first.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}
