//! Markdown rendering of BTT JSON payloads.

use serde_json::Value;

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// BTT flags are usually integers, sometimes booleans.
fn truthy(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|n| n != 0.0).unwrap_or(default),
        Some(Value::Null) | None => default,
        Some(_) => true,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn status_icon(enabled: bool) -> &'static str {
    if enabled {
        "✅"
    } else {
        "❌"
    }
}

/// Treat a top-level object as a one-element list.
pub fn as_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Render a single trigger.
pub fn format_trigger(trigger: &Value, indent: usize) -> String {
    let prefix = "  ".repeat(indent);
    let name = str_field(trigger, "BTTTriggerName")
        .or_else(|| str_field(trigger, "BTTTouchBarButtonName"))
        .unwrap_or("Unnamed");
    let uuid = str_field(trigger, "BTTUUID").unwrap_or("N/A");
    let enabled = truthy(trigger.get("BTTEnabled"), true);
    let class = str_field(trigger, "BTTTriggerClass").unwrap_or("Unknown");

    let mut lines = vec![
        format!("{prefix}- **{name}** {}", status_icon(enabled)),
        format!("{prefix}  - UUID: `{uuid}`"),
        format!("{prefix}  - Type: {class}"),
    ];

    if let Some(action) = str_field(trigger, "BTTPredefinedActionName") {
        lines.push(format!("{prefix}  - Action: {action}"));
    }

    if let Some(key_code) = trigger.get("BTTShortcutKeyCode").filter(|v| !v.is_null()) {
        let modifiers = trigger
            .get("BTTShortcutModifierKeys")
            .map(display)
            .unwrap_or_else(|| "0".into());
        lines.push(format!(
            "{prefix}  - Key Code: {}, Modifiers: {}",
            display(key_code),
            modifiers
        ));
    }

    if let Some(actions) = trigger
        .get("BTTAssignedActions")
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
    {
        lines.push(format!("{prefix}  - Assigned Actions: {}", actions.len()));
    }

    lines.join("\n")
}

/// Render a list of triggers under a `##` heading.
pub fn format_triggers_list(triggers: &[Value], title: &str) -> String {
    if triggers.is_empty() {
        return format!("## {title}\n\nNo triggers found.");
    }

    let mut lines = vec![
        format!("## {title}"),
        format!("\nFound {} trigger(s):\n", triggers.len()),
    ];
    for trigger in triggers {
        lines.push(format_trigger(trigger, 0));
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Render `get_preset_details` output.
pub fn format_preset_details(presets: &[Value]) -> String {
    if presets.is_empty() {
        return "No preset details found.".into();
    }

    let mut lines = vec!["## Preset Details\n".to_string()];
    for preset in presets {
        let name = str_field(preset, "name").unwrap_or("Unknown");
        let uuid = str_field(preset, "uuid").unwrap_or("N/A");
        let status = match preset.get("activated").and_then(Value::as_i64).unwrap_or(0) {
            0 => "Disabled",
            1 => "Enabled",
            2 => "Enabled (Master Preset)",
            _ => "Unknown",
        };
        let hidden = truthy(preset.get("hidden"), false);

        lines.push(format!("### {name}"));
        lines.push(format!("- UUID: `{uuid}`"));
        lines.push(format!("- Status: {status}"));
        lines.push(format!("- Hidden: {}", if hidden { "Yes" } else { "No" }));
        lines.push(String::new());
    }
    lines.join("\n")
}

fn menu_item_kind(trigger_type: i64) -> &'static str {
    match trigger_type {
        767 => "Floating Menu",
        773 => "Button",
        774 => "Submenu",
        775 => "Slider",
        776 => "Text Field",
        777 => "Back Button",
        778 => "Web View",
        800 => "Trackpad Widget",
        801 => "Row Breaker",
        802 => "Column Breaker",
        810 => "Text Area",
        811 => "Floating Menu Reference",
        _ => "Item",
    }
}

/// Render a floating menu and its items.
pub fn format_floating_menu(menu: &Value) -> String {
    let name = str_field(menu, "BTTMenuName")
        .or_else(|| str_field(menu, "BTTTriggerName"))
        .unwrap_or("Unnamed");
    let uuid = str_field(menu, "BTTUUID").unwrap_or("N/A");
    let enabled = truthy(menu.get("BTTEnabled"), true);

    let mut lines = vec![
        format!("### {name} {}", status_icon(enabled)),
        format!("- UUID: `{uuid}`"),
    ];

    if let Some(app) = str_field(menu, "BTTAppBundleIdentifier") {
        lines.push(format!("- App: `{app}`"));
    }

    if let Some(config) = menu.get("BTTMenuConfig") {
        if let (Some(w), Some(h)) = (config.get("BTTMenuFrameWidth"), config.get("BTTMenuFrameHeight")) {
            lines.push(format!("- Size: {}x{}", display(w), display(h)));
        }
        if let Some(visibility) = config.get("BTTMenuVisibility").and_then(Value::as_i64) {
            let shown = if visibility == 0 { "on launch" } else { "via action" };
            lines.push(format!("- Shown: {shown}"));
        }
    }

    let items = menu
        .get("BTTMenuItems")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    if items.is_empty() {
        lines.push("- Items: none".into());
    } else {
        lines.push(format!("- Items: {}", items.len()));
        for item in items {
            lines.push(format_floating_menu_item(item, 1));
        }
    }

    lines.join("\n")
}

/// Render one floating menu item.
pub fn format_floating_menu_item(item: &Value, indent: usize) -> String {
    let prefix = "  ".repeat(indent);
    let name = str_field(item, "BTTMenuName")
        .or_else(|| str_field(item, "BTTTriggerName"))
        .unwrap_or("Unnamed");
    let uuid = str_field(item, "BTTUUID").unwrap_or("N/A");
    let kind = item
        .get("BTTTriggerType")
        .and_then(Value::as_i64)
        .map(menu_item_kind)
        .unwrap_or("Item");

    let mut line = format!("{prefix}- **{name}** ({kind}) `{uuid}`");
    if let Some(actions) = item
        .get("BTTMenuItemActions")
        .or_else(|| item.get("BTTAssignedActions"))
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
    {
        line.push_str(&format!(" - {} action(s)", actions.len()));
    }
    line
}

/// Render a list of floating menus.
pub fn format_floating_menus_list(menus: &[Value]) -> String {
    if menus.is_empty() {
        return "## Floating Menus\n\nNo floating menus found.".into();
    }

    let mut parts = vec![format!(
        "## Floating Menus\n\nFound {} floating menu(s):\n",
        menus.len()
    )];
    parts.extend(menus.iter().map(format_floating_menu));
    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_basic_trigger() {
        let trigger = json!({
            "BTTTriggerName": "Test Trigger",
            "BTTUUID": "12345678-1234-1234-1234-123456789012",
            "BTTEnabled": 1,
            "BTTTriggerClass": "BTTTriggerTypeKeyboardShortcut",
        });
        let result = format_trigger(&trigger, 0);
        assert!(result.contains("**Test Trigger**"));
        assert!(result.contains("✅"));
        assert!(result.contains("12345678-1234-1234-1234-123456789012"));
        assert!(result.contains("Type: BTTTriggerTypeKeyboardShortcut"));
    }

    #[test]
    fn test_disabled_trigger() {
        let result = format_trigger(&json!({"BTTTriggerName": "Disabled", "BTTEnabled": 0}), 0);
        assert!(result.contains("❌"));
    }

    #[test]
    fn test_unnamed_and_touch_bar_fallback() {
        assert!(format_trigger(&json!({"BTTUUID": "x"}), 0).contains("**Unnamed**"));
        let tb = json!({"BTTTouchBarButtonName": "Touch Bar Button"});
        assert!(format_trigger(&tb, 0).contains("**Touch Bar Button**"));
    }

    #[test]
    fn test_keyboard_shortcut_and_actions() {
        let trigger = json!({
            "BTTTriggerName": "Shortcut",
            "BTTShortcutKeyCode": 0,
            "BTTShortcutModifierKeys": 256,
            "BTTAssignedActions": [{}, {}, {}],
        });
        let result = format_trigger(&trigger, 0);
        assert!(result.contains("Key Code: 0, Modifiers: 256"));
        assert!(result.contains("Assigned Actions: 3"));
    }

    #[test]
    fn test_indentation() {
        let result = format_trigger(&json!({"BTTTriggerName": "Indented"}), 2);
        assert!(result.starts_with("    -"));
    }

    #[test]
    fn test_triggers_list() {
        assert!(format_triggers_list(&[], "Triggers").contains("No triggers found"));
        assert!(format_triggers_list(&[], "Named Triggers").contains("## Named Triggers"));

        let triggers = vec![
            json!({"BTTTriggerName": "First", "BTTUUID": "uuid-1"}),
            json!({"BTTTriggerName": "Second", "BTTUUID": "uuid-2"}),
        ];
        let result = format_triggers_list(&triggers, "Triggers");
        assert!(result.contains("Found 2 trigger(s)"));
        assert!(result.contains("**Second**"));
    }

    #[test]
    fn test_preset_details() {
        assert_eq!(format_preset_details(&[]), "No preset details found.");

        let presets = vec![
            json!({"name": "My Preset", "uuid": "p-1", "activated": 1, "hidden": 0}),
            json!({"name": "Master", "activated": 2, "hidden": 1}),
        ];
        let result = format_preset_details(&presets);
        assert!(result.contains("### My Preset"));
        assert!(result.contains("Status: Enabled\n"));
        assert!(result.contains("Hidden: No"));
        assert!(result.contains("Enabled (Master Preset)"));
        assert!(result.contains("Hidden: Yes"));
    }

    #[test]
    fn test_floating_menu() {
        let menu = json!({
            "BTTUUID": "M-1",
            "BTTMenuName": "Tools",
            "BTTEnabled": 1,
            "BTTMenuConfig": {"BTTMenuFrameWidth": 300, "BTTMenuFrameHeight": 200, "BTTMenuVisibility": 1},
            "BTTMenuItems": [
                {"BTTMenuName": "Run", "BTTUUID": "I-1", "BTTTriggerType": 773,
                 "BTTMenuItemActions": [{"BTTPredefinedActionType": 5}]},
                {"BTTMenuName": "Volume", "BTTUUID": "I-2", "BTTTriggerType": 775}
            ]
        });
        let result = format_floating_menu(&menu);
        assert!(result.starts_with("### Tools ✅"));
        assert!(result.contains("- Size: 300x200"));
        assert!(result.contains("- Shown: via action"));
        assert!(result.contains("- Items: 2"));
        assert!(result.contains("  - **Run** (Button) `I-1` - 1 action(s)"));
        assert!(result.contains("  - **Volume** (Slider) `I-2`"));
    }

    #[test]
    fn test_floating_menus_list() {
        assert!(format_floating_menus_list(&[]).contains("No floating menus found"));
        let menus = as_list(json!({"BTTMenuName": "Solo"}));
        let result = format_floating_menus_list(&menus);
        assert!(result.contains("Found 1 floating menu(s)"));
        assert!(result.contains("### Solo"));
        assert!(result.contains("- Items: none"));
    }
}
