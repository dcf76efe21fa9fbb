//! Push notification contract of the House-App service worker.
//!
//! Covers the two decisions the worker makes: what a push payload turns
//! into on screen, and which browser window a notification click lands in.

use serde::{Deserialize, Serialize};

/// Title shown when the payload has none.
pub const DEFAULT_TITLE: &str = "House App";

/// Body shown when the payload has none.
pub const DEFAULT_BODY: &str = "¡Tienes una nueva notificación!";

/// Icon and badge used when the payload has none.
pub const DEFAULT_ICON: &str = "/static/icons/house-icon.png";

/// Target opened on click when the payload has no URL.
pub const DEFAULT_URL: &str = "/";

/// Vibration pattern in milliseconds (on, off, on).
pub const VIBRATION_PATTERN: [u32; 3] = [200, 100, 200];

/// Fields a push message may carry. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Notification title
    #[serde(default)]
    pub title: Option<String>,
    /// Notification body text
    #[serde(default)]
    pub body: Option<String>,
    /// Icon URL
    #[serde(default)]
    pub icon: Option<String>,
    /// Badge URL
    #[serde(default)]
    pub badge: Option<String>,
    /// Page opened when the notification is clicked
    #[serde(default)]
    pub url: Option<String>,
}

impl NotificationPayload {
    /// Parses raw push data.
    ///
    /// Each field is read on its own: a field that is missing, empty or not
    /// a string is left unset without affecting the others. Data that is
    /// not a JSON object yields an empty payload and is logged.
    #[must_use]
    pub fn parse(data: &[u8]) -> Self {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }
        let value: serde_json::Value = match serde_json::from_slice(data) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Error parsing push payload");
                return Self::default();
            }
        };
        if !value.is_object() {
            tracing::warn!("Push payload is not a JSON object");
            return Self::default();
        }

        let field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };
        Self {
            title: field("title"),
            body: field("body"),
            icon: field("icon"),
            badge: field("badge"),
            url: field("url"),
        }
    }
}

/// What the worker asks the browser to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSpec {
    /// Title line
    pub title: String,
    /// Body text
    pub body: String,
    /// Icon URL
    pub icon: String,
    /// Badge URL
    pub badge: String,
    /// Vibration pattern
    pub vibrate: Vec<u32>,
    /// Click target
    pub url: String,
}

impl NotificationSpec {
    /// Fills missing or empty payload fields with the House-App defaults.
    #[must_use]
    pub fn from_payload(payload: NotificationPayload) -> Self {
        fn or_default(value: Option<String>, default: &str) -> String {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            title: or_default(payload.title, DEFAULT_TITLE),
            body: or_default(payload.body, DEFAULT_BODY),
            icon: or_default(payload.icon, DEFAULT_ICON),
            badge: or_default(payload.badge, DEFAULT_ICON),
            vibrate: VIBRATION_PATTERN.to_vec(),
            url: or_default(payload.url, DEFAULT_URL),
        }
    }
}

/// How an open window's URL is compared with the click target.
///
/// The worker registers two click handlers, one matching by substring and
/// one by equality. Both are kept; `Contains` is the one registered first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Window URL contains the target.
    #[default]
    Contains,
    /// Window URL equals the target.
    Exact,
}

impl MatchStrategy {
    /// Returns true if `window_url` matches `target`.
    #[must_use]
    pub fn matches(self, window_url: &str, target: &str) -> bool {
        match self {
            Self::Contains => window_url.contains(target),
            Self::Exact => window_url == target,
        }
    }
}

/// An open browser window as seen by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowClient {
    /// Current URL
    pub url: String,
    /// Whether the window can be focused
    pub focusable: bool,
}

/// What to do after a notification click. The notification itself is
/// always closed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClickAction {
    /// Focus the window at this index of the client list.
    Focus {
        /// Index into the window list
        index: usize,
    },
    /// Open a new window at this URL.
    Open {
        /// URL to open
        url: String,
    },
}

/// Picks the first focusable window matching `target`, or opens a new one.
#[must_use]
pub fn route_click(windows: &[WindowClient], target: &str, strategy: MatchStrategy) -> ClickAction {
    windows
        .iter()
        .position(|w| w.focusable && strategy.matches(&w.url, target))
        .map_or_else(
            || ClickAction::Open {
                url: target.to_string(),
            },
            |index| ClickAction::Focus { index },
        )
}
