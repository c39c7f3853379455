//! Connection settings and BetterTouchTool constants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

/// Default BTT webserver host.
pub const DEFAULT_BTT_HOST: &str = "127.0.0.1";

/// Default BTT webserver port.
pub const DEFAULT_BTT_PORT: u16 = 12345;

/// Ceiling for a single outbound call to BTT, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// `BTTTriggerType` of named triggers (the "Other" tab).
pub const NAMED_TRIGGER_ID: u32 = 643;

/// `BTTTriggerType` of a top-level floating menu.
pub const FLOATING_MENU_TRIGGER_ID: u32 = 767;

/// Install locations of `bttcli` relative to an `Applications` folder.
const BTTCLI_RELATIVE: &str = "BetterTouchTool.app/Contents/SharedSupport/bin/bttcli";

/// Shorthand trigger type names and the `BTTTriggerClass` they stand for.
pub const TRIGGER_TYPES: &[(&str, &str)] = &[
    ("keyboard_shortcut", "BTTTriggerTypeKeyboardShortcut"),
    ("trackpad", "BTTTriggerTypeTrackpad"),
    ("magic_mouse", "BTTTriggerTypeMagicMouse"),
    ("touch_bar", "BTTTriggerTypeTouchBar"),
    ("siri_remote", "BTTTriggerTypeSiriRemote"),
    ("named", "BTTTriggerTypeOtherTriggers"),
    ("stream_deck", "BTTTriggerTypeStreamDeck"),
    ("floating_menu", "BTTTriggerTypeFloatingMenu"),
    ("notch_bar", "BTTTriggerTypeNotchBar"),
    ("drawing", "BTTTriggerTypeDrawing"),
];

/// Resolve a trigger type filter. Shorthand names map to their trigger class;
/// anything else is passed through untouched.
pub fn trigger_class(name: &str) -> &str {
    TRIGGER_TYPES
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, class)| *class)
        .unwrap_or(name)
}

/// How to reach a running BetterTouchTool instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Webserver host.
    #[serde(deserialize_with = "trimmed")]
    pub host: String,
    /// Webserver port (1-65535).
    #[serde(deserialize_with = "port")]
    pub port: u16,
    /// Shared secret, if the webserver requires one.
    pub shared_secret: Option<String>,
    /// Talk to BTT through `bttcli` instead of HTTP.
    pub use_cli: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BTT_HOST.into(),
            port: DEFAULT_BTT_PORT,
            shared_secret: None,
            use_cli: false,
        }
    }
}

impl ConnectionConfig {
    /// `host:port` as shown in messages.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

fn port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    let value = u64::deserialize(deserializer)?;
    match u16::try_from(value) {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(serde::de::Error::custom(format!(
            "port must be between 1 and 65535, got {value}"
        ))),
    }
}

/// Candidate `bttcli` locations, checked in order.
pub fn bttcli_candidates() -> Vec<PathBuf> {
    let mut paths = vec![Path::new("/Applications").join(BTTCLI_RELATIVE)];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join("Applications").join(BTTCLI_RELATIVE));
    }
    paths
}

/// Find the `bttcli` executable, preferring an explicit override.
pub fn find_bttcli(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    bttcli_candidates().into_iter().find(|p| p.exists())
}
