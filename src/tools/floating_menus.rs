//! Floating menu tools.
//!
//! Menus are triggers of type [`FLOATING_MENU_TRIGGER_ID`]; their items are
//! child triggers pointing at the menu through `BTTTriggerParentUUID`. Menus
//! and items are built here with sensible defaults. Anything more elaborate
//! goes through `btt_add_trigger` with hand-written JSON.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::args::{self, ResponseFormat};
use super::{confirm, render_json, reply_or, Tool, ToolContext};
use crate::client::{self, Params};
use crate::config::{ConnectionConfig, FLOATING_MENU_TRIGGER_ID};
use crate::error::{Error, Result};
use crate::format;
use crate::protocol::{ToolAnnotations, ToolCallResult, ToolDefinition};

/// Trigger type of a standard (button) menu item.
pub const STANDARD_ITEM_TYPE: i64 = 773;

/// `BTTMenuItemBackgroundType` value for a solid color.
const BACKGROUND_COLOR: i64 = 4;

/// `BTTMenuItemIconType` value for an SF Symbol.
const ICON_SF_SYMBOL: i64 = 2;

/// Smallest accepted menu width or height.
const MIN_MENU_DIMENSION: u32 = 50;

pub(super) fn tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(GetFloatingMenusTool),
        Arc::new(GetFloatingMenuTool),
        Arc::new(CreateFloatingMenuTool),
        Arc::new(AddFloatingMenuItemTool),
        Arc::new(UpdateFloatingMenuTool),
        Arc::new(MenuVisibilityTool(MenuVisibility::Show)),
        Arc::new(MenuVisibilityTool(MenuVisibility::Hide)),
        Arc::new(MenuVisibilityTool(MenuVisibility::Toggle)),
    ]
}

/// Fresh upper-case UUID, the form BTT uses.
fn new_uuid() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}

fn flag(value: bool) -> i64 {
    i64::from(value)
}

/// BTT's reply when it has one, otherwise the UUID we generated.
fn created(response: String, generated: String) -> ToolCallResult {
    if client::is_error(&response) {
        return ToolCallResult::text(response);
    }
    let reply = response.trim();
    if reply.is_empty() {
        ToolCallResult::text(generated)
    } else {
        ToolCallResult::text(reply)
    }
}

/// List floating menus.
pub struct GetFloatingMenusTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetMenusArgs {
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    app_bundle_identifier: Option<String>,
    #[serde(default)]
    response_format: ResponseFormat,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for GetFloatingMenusTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_get_floating_menus".to_string(),
            description: "List all floating menus, optionally only those of one app.".to_string(),
            input_schema: args::object_schema(
                json!({
                    "app_bundle_identifier": {
                        "type": "string",
                        "description": "Only menus for this app (e.g. 'com.apple.Safari')"
                    },
                    "response_format": args::response_format_schema()
                }),
                &[],
            ),
            annotations: Some(ToolAnnotations::read_only("Get Floating Menus")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: GetMenusArgs = args::parse(arguments)?;
        let params = Params::new()
            .set("trigger_id", FLOATING_MENU_TRIGGER_ID)
            .set_opt("trigger_app_bundle_identifier", args.app_bundle_identifier);

        let response = context
            .request("get_triggers", params, args.connection.as_ref())
            .await;
        Ok(render_json(response, args.response_format, |menus| {
            format::format_floating_menus_list(&format::as_list(menus))
        }))
    }
}

/// Fetch one floating menu with its items.
pub struct GetFloatingMenuTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetMenuArgs {
    #[serde(deserialize_with = "args::trimmed")]
    uuid: String,
    #[serde(default)]
    response_format: ResponseFormat,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for GetFloatingMenuTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_get_floating_menu".to_string(),
            description: "Retrieve a floating menu's full configuration including its items."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "uuid": args::uuid_schema("UUID of the floating menu"),
                    "response_format": args::response_format_schema()
                }),
                &["uuid"],
            ),
            annotations: Some(ToolAnnotations::read_only("Get Single Floating Menu")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: GetMenuArgs = args::parse(arguments)?;
        args::require_uuid("uuid", &args.uuid)?;
        let response = context
            .request(
                "get_trigger",
                Params::new().set("uuid", &args.uuid),
                args.connection.as_ref(),
            )
            .await;
        Ok(render_json(response, args.response_format, |menu| {
            format::format_floating_menu(&menu)
        }))
    }
}

/// Create an empty floating menu.
pub struct CreateFloatingMenuTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct CreateMenuArgs {
    #[serde(deserialize_with = "args::trimmed")]
    name: String,
    positioning_type: i64,
    position_relative_to: i64,
    anchor_menu: i64,
    anchor_relation: i64,
    offset_x: i64,
    offset_y: i64,
    width: u32,
    height: u32,
    layout_direction: i64,
    vertical_spacing: i64,
    horizontal_spacing: i64,
    window_level: i64,
    opacity: f64,
    corner_radius: u32,
    #[serde(deserialize_with = "args::trimmed_opt")]
    background_color: Option<String>,
    visibility: i64,
    close_on_outside_click: bool,
    close_after_action: bool,
    #[serde(deserialize_with = "args::trimmed_opt")]
    app_bundle_identifier: Option<String>,
    connection: Option<ConnectionConfig>,
}

impl Default for CreateMenuArgs {
    fn default() -> Self {
        Self {
            name: String::new(),
            positioning_type: 1,
            position_relative_to: 1,
            anchor_menu: 4,
            anchor_relation: 4,
            offset_x: 0,
            offset_y: 0,
            width: 300,
            height: 200,
            layout_direction: 1,
            vertical_spacing: 5,
            horizontal_spacing: 5,
            window_level: 3,
            opacity: 1.0,
            corner_radius: 10,
            background_color: None,
            visibility: 1,
            close_on_outside_click: true,
            close_after_action: true,
            app_bundle_identifier: None,
            connection: None,
        }
    }
}

impl CreateMenuArgs {
    fn validate(&self) -> Result<()> {
        args::require_non_empty("name", &self.name)?;
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if value < MIN_MENU_DIMENSION {
                return Err(Error::InvalidParams(format!(
                    "{field} must be at least {MIN_MENU_DIMENSION}, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(Error::InvalidParams(format!(
                "opacity must be between 0.0 and 1.0, got {}",
                self.opacity
            )));
        }
        Ok(())
    }

    /// The trigger JSON for the new menu.
    fn menu_json(&self, uuid: &str) -> Value {
        let mut config = json!({
            "BTTMenuPositioningType": self.positioning_type,
            "BTTMenuPositionRelativeTo": self.position_relative_to,
            "BTTMenuAnchorMenu": self.anchor_menu,
            "BTTMenuAnchorRelation": self.anchor_relation,
            "BTTMenuOffsetX": self.offset_x,
            "BTTMenuOffsetY": self.offset_y,
            "BTTMenuFrameWidth": self.width,
            "BTTMenuFrameHeight": self.height,
            "BTTMenuSizingBehavior": 1,
            "BTTMenuLayoutDirection": self.layout_direction,
            "BTTMenuVerticalSpacing": self.vertical_spacing,
            "BTTMenuHorizontalSpacing": self.horizontal_spacing,
            "BTTMenuWindowLevel": self.window_level,
            "BTTMenuOpacityActive": self.opacity,
            "BTTMenuOpacityInactive": self.opacity * 0.9,
            "BTTMenuItemCornerRadius": self.corner_radius,
            "BTTMenuVisibility": self.visibility,
            "BTTMenuCloseOnOutsideClick": flag(self.close_on_outside_click),
            "BTTMenuCloseAfterAction": flag(self.close_after_action),
        });
        if let (Some(color), Some(config)) = (&self.background_color, config.as_object_mut()) {
            config.insert("BTTMenuItemBackgroundType".into(), json!(BACKGROUND_COLOR));
            config.insert("BTTMenuItemBackgroundColor".into(), json!(color));
        }

        let mut trigger = json!({
            "BTTTriggerType": FLOATING_MENU_TRIGGER_ID,
            "BTTTriggerClass": "BTTTriggerTypeFloatingMenu",
            "BTTUUID": uuid,
            "BTTEnabled": 1,
            "BTTTriggerName": format!("Floating Menu: {}", self.name),
            "BTTMenuName": self.name,
            "BTTMenuConfig": config,
            "BTTMenuItems": [],
            "BTTMenuAvailability": 0,
        });
        if let (Some(app), Some(trigger)) = (&self.app_bundle_identifier, trigger.as_object_mut()) {
            trigger.insert("BTTAppBundleIdentifier".into(), json!(app));
        }
        trigger
    }
}

#[async_trait::async_trait]
impl Tool for CreateFloatingMenuTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_create_floating_menu".to_string(),
            description: "Create a floating menu with sensible defaults. Returns the new menu's \
                UUID; add items with btt_add_floating_menu_item."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "name": {"type": "string", "minLength": 1, "description": "Display name of the menu"},
                    "positioning_type": {"type": "integer", "default": 1, "description": "0=freeMove, 1=fixedPosition, 2=menubarStatusItem"},
                    "position_relative_to": {"type": "integer", "default": 1, "description": "0=focusedWindow, 1=screenWithMouse, 7=mouse"},
                    "anchor_menu": {"type": "integer", "default": 4, "description": "0=topLeft, 1=topRight, 2=botLeft, 3=botRight, 4=center"},
                    "anchor_relation": {"type": "integer", "default": 4, "description": "0=topLeft, 1=topRight, 2=botLeft, 3=botRight, 4=center"},
                    "offset_x": {"type": "integer", "default": 0, "description": "Horizontal offset from the anchor"},
                    "offset_y": {"type": "integer", "default": 0, "description": "Vertical offset from the anchor"},
                    "width": {"type": "integer", "minimum": MIN_MENU_DIMENSION, "default": 300, "description": "Menu width in pixels"},
                    "height": {"type": "integer", "minimum": MIN_MENU_DIMENSION, "default": 200, "description": "Menu height in pixels"},
                    "layout_direction": {"type": "integer", "default": 1, "description": "0=fillRow, 1=fillColumn, 6=vertical, 7=horizontal, 8=circular"},
                    "vertical_spacing": {"type": "integer", "default": 5},
                    "horizontal_spacing": {"type": "integer", "default": 5},
                    "window_level": {"type": "integer", "default": 3, "description": "0=normal, 3=floating, 20=dock, 24=mainMenu"},
                    "opacity": {"type": "number", "minimum": 0.0, "maximum": 1.0, "default": 1.0},
                    "corner_radius": {"type": "integer", "minimum": 0, "default": 10},
                    "background_color": {"type": "string", "description": "Background color as 'R,G,B,A' (e.g. '40,40,40,230')"},
                    "visibility": {"type": "integer", "default": 1, "description": "0=showOnLaunch, 1=showViaAction"},
                    "close_on_outside_click": {"type": "boolean", "default": true},
                    "close_after_action": {"type": "boolean", "default": true},
                    "app_bundle_identifier": {"type": "string", "description": "Make the menu app-specific"}
                }),
                &["name"],
            ),
            annotations: Some(ToolAnnotations::mutating("Create Floating Menu")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: CreateMenuArgs = args::parse(arguments)?;
        args.validate()?;

        let uuid = new_uuid();
        let menu = args.menu_json(&uuid);
        tracing::debug!(uuid = %uuid, name = %args.name, "creating floating menu");

        let response = context
            .request(
                "add_new_trigger",
                Params::new().set("json", menu),
                args.connection.as_ref(),
            )
            .await;
        Ok(created(response, uuid))
    }
}

/// Add an item to a floating menu.
pub struct AddFloatingMenuItemTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AddItemArgs {
    #[serde(deserialize_with = "args::trimmed")]
    menu_uuid: String,
    #[serde(deserialize_with = "args::trimmed")]
    name: String,
    #[serde(default = "default_item_type")]
    item_type: i64,
    #[serde(default)]
    min_width: Option<u32>,
    #[serde(default)]
    min_height: Option<u32>,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    background_color: Option<String>,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    background_color_hover: Option<String>,
    #[serde(default = "default_item_corner_radius")]
    corner_radius: u32,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    sf_symbol_name: Option<String>,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    icon_color: Option<String>,
    #[serde(default)]
    icon_position: i64,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    actions_json: Option<String>,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

fn default_item_type() -> i64 {
    STANDARD_ITEM_TYPE
}

fn default_item_corner_radius() -> u32 {
    8
}

impl AddItemArgs {
    fn item_config(&self) -> Value {
        let mut config = Map::new();
        config.insert("BTTMenuItemVisibleWhileActive".into(), json!(1));
        config.insert("BTTMenuItemVisibleWhileInactive".into(), json!(1));
        config.insert("BTTMenuItemCornerRadius".into(), json!(self.corner_radius));

        if let Some(width) = self.min_width.filter(|w| *w > 0) {
            config.insert("BTTMenuItemMinWidth".into(), json!(width));
        }
        if let Some(height) = self.min_height.filter(|h| *h > 0) {
            config.insert("BTTMenuItemMinHeight".into(), json!(height));
        }
        if let Some(color) = &self.background_color {
            config.insert("BTTMenuItemBackgroundType".into(), json!(BACKGROUND_COLOR));
            config.insert("BTTMenuItemBackgroundColor".into(), json!(color));
        }
        if let Some(color) = &self.background_color_hover {
            config.insert("BTTMenuItemBackgroundColorHover".into(), json!(color));
        }
        if let Some(symbol) = &self.sf_symbol_name {
            config.insert("BTTMenuItemIconType".into(), json!(ICON_SF_SYMBOL));
            config.insert("BTTMenuItemSFSymbolName".into(), json!(symbol));
            config.insert("BTTMenuItemIconPosition".into(), json!(self.icon_position));
            if let Some(color) = &self.icon_color {
                config.insert("BTTMenuItemIconColor1".into(), json!(color));
            }
        }
        Value::Object(config)
    }

    /// The trigger JSON for the new item, or `None` if `actions_json` is not
    /// a JSON array.
    fn item_json(&self, uuid: &str) -> Option<Value> {
        let mut item = json!({
            "BTTTriggerType": self.item_type,
            "BTTTriggerParentUUID": self.menu_uuid,
            "BTTUUID": uuid,
            "BTTEnabled": 1,
            "BTTTriggerName": self.name,
            "BTTMenuName": self.name,
            "BTTMenuConfig": self.item_config(),
        });
        if let Some(raw) = &self.actions_json {
            let actions = match serde_json::from_str::<Value>(raw) {
                Ok(actions @ Value::Array(_)) => actions,
                _ => return None,
            };
            if let Some(item) = item.as_object_mut() {
                item.insert("BTTMenuItemActions".into(), actions);
            }
        }
        Some(item)
    }
}

#[async_trait::async_trait]
impl Tool for AddFloatingMenuItemTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_add_floating_menu_item".to_string(),
            description: "Add an item (button, submenu, slider, text field, web view, ...) to a \
                floating menu. Returns the new item's UUID."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "menu_uuid": args::uuid_schema("UUID of the floating menu to add the item to"),
                    "name": {"type": "string", "description": "Display name/text of the item"},
                    "item_type": {"type": "integer", "default": STANDARD_ITEM_TYPE, "description": "773=button, 774=submenu, 775=slider, 776=textField, 778=webView"},
                    "min_width": {"type": "integer", "minimum": 0},
                    "min_height": {"type": "integer", "minimum": 0},
                    "background_color": {"type": "string", "description": "Background color as 'R,G,B,A'"},
                    "background_color_hover": {"type": "string", "description": "Hover background color as 'R,G,B,A'"},
                    "corner_radius": {"type": "integer", "minimum": 0, "default": 8},
                    "sf_symbol_name": {"type": "string", "description": "SF Symbol name (e.g. 'gear', 'star.fill')"},
                    "icon_color": {"type": "string", "description": "Icon color as 'R,G,B,A'"},
                    "icon_position": {"type": "integer", "default": 0, "description": "0=left, 1=top, 2=right, 3=bottom, 4=center"},
                    "actions_json": {"type": "string", "description": "JSON array of actions to run when the item is clicked"}
                }),
                &["menu_uuid", "name"],
            ),
            annotations: Some(ToolAnnotations::mutating("Add Floating Menu Item")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: AddItemArgs = args::parse(arguments)?;
        args::require_uuid("menu_uuid", &args.menu_uuid)?;

        let uuid = new_uuid();
        let Some(item) = args.item_json(&uuid) else {
            return Ok(ToolCallResult::text(
                "Error: Invalid actions_json - must be a valid JSON array",
            ));
        };

        let params = Params::new()
            .set("json", item)
            .set("trigger_parent_uuid", &args.menu_uuid);
        let response = context
            .request("add_new_trigger", params, args.connection.as_ref())
            .await;
        Ok(created(response, uuid))
    }
}

/// Update a floating menu or item.
pub struct UpdateFloatingMenuTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateMenuArgs {
    #[serde(deserialize_with = "args::trimmed")]
    uuid: String,
    #[serde(deserialize_with = "args::trimmed")]
    update_json: String,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for UpdateFloatingMenuTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_update_floating_menu".to_string(),
            description: "Update a floating menu or menu item. Use BTTMenu* keys for menu \
                config and BTTMenuItem* keys for items."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "uuid": args::uuid_schema("UUID of the floating menu or item"),
                    "update_json": {"type": "string", "description": "JSON with the properties to change"}
                }),
                &["uuid", "update_json"],
            ),
            annotations: Some(ToolAnnotations::mutating("Update Floating Menu").idempotent()),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: UpdateMenuArgs = args::parse(arguments)?;
        args::require_uuid("uuid", &args.uuid)?;
        let params = Params::new()
            .set("uuid", &args.uuid)
            .set("json", &args.update_json);

        let response = context
            .request("update_trigger", params, args.connection.as_ref())
            .await;
        Ok(reply_or(response, "Floating menu updated successfully."))
    }
}

/// Visibility change applied through a predefined action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuVisibility {
    Show,
    Hide,
    Toggle,
}

impl MenuVisibility {
    /// `BTTPredefinedActionType` of the action.
    pub fn action_type(self) -> u32 {
        match self {
            MenuVisibility::Show => 367,
            MenuVisibility::Hide => 368,
            MenuVisibility::Toggle => 369,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            MenuVisibility::Show => "Show",
            MenuVisibility::Hide => "Hide",
            MenuVisibility::Toggle => "Toggle",
        }
    }

    fn done(self) -> &'static str {
        match self {
            MenuVisibility::Show => "Floating menu shown.",
            MenuVisibility::Hide => "Floating menu hidden.",
            MenuVisibility::Toggle => "Floating menu toggled.",
        }
    }

    /// The `trigger_action` JSON for a menu.
    pub fn action_json(self, menu_uuid: &str) -> Value {
        json!({
            "BTTPredefinedActionType": self.action_type(),
            "BTTPredefinedActionName": format!("{} Floating HTML Menu", self.verb()),
            "BTTFloatingMenuUUID": menu_uuid,
        })
    }
}

/// Show, hide or toggle a floating menu.
pub struct MenuVisibilityTool(pub MenuVisibility);

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MenuUuidArgs {
    #[serde(deserialize_with = "args::trimmed")]
    uuid: String,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for MenuVisibilityTool {
    fn definition(&self) -> ToolDefinition {
        let visibility = self.0;
        let verb = visibility.verb();
        let annotations = ToolAnnotations::mutating(format!("{verb} Floating Menu"));
        ToolDefinition {
            name: format!("btt_{}_floating_menu", verb.to_lowercase()),
            description: match visibility {
                MenuVisibility::Show => "Show a floating menu on screen.",
                MenuVisibility::Hide => "Hide a floating menu.",
                MenuVisibility::Toggle => "Toggle a floating menu: hide it if visible, show it otherwise.",
            }
            .to_string(),
            input_schema: args::object_schema(
                json!({"uuid": args::uuid_schema("UUID of the floating menu")}),
                &["uuid"],
            ),
            annotations: Some(match visibility {
                MenuVisibility::Toggle => annotations,
                _ => annotations.idempotent(),
            }),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: MenuUuidArgs = args::parse(arguments)?;
        args::require_uuid("uuid", &args.uuid)?;
        let params = Params::new().set("json", self.0.action_json(&args.uuid));

        let response = context
            .request("trigger_action", params, args.connection.as_ref())
            .await;
        Ok(confirm(response, self.0.done()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;

    #[test]
    fn test_new_uuid_is_upper_case_v4() {
        let uuid = new_uuid();
        assert_eq!(uuid.len(), 36);
        assert_eq!(uuid, uuid.to_uppercase());
        assert_eq!(uuid.chars().nth(14), Some('4'));
    }

    #[test]
    fn test_menu_json_defaults() {
        let args: CreateMenuArgs = args::parse(json!({"name": "Tools"})).unwrap();
        args.validate().unwrap();
        let menu = args.menu_json("ABC");
        assert_eq!(menu["BTTTriggerType"], 767);
        assert_eq!(menu["BTTTriggerName"], "Floating Menu: Tools");
        assert_eq!(menu["BTTMenuConfig"]["BTTMenuFrameWidth"], 300);
        assert_eq!(menu["BTTMenuConfig"]["BTTMenuCloseAfterAction"], 1);
        assert!(menu["BTTMenuConfig"].get("BTTMenuItemBackgroundType").is_none());
        assert!(menu.get("BTTAppBundleIdentifier").is_none());
        assert_eq!(menu["BTTMenuItems"], json!([]));
    }

    #[test]
    fn test_menu_json_optional_fields() {
        let args: CreateMenuArgs = args::parse(json!({
            "name": "Tools",
            "background_color": "40,40,40,230",
            "app_bundle_identifier": "com.apple.Safari",
            "close_after_action": false
        }))
        .unwrap();
        let menu = args.menu_json("ABC");
        assert_eq!(menu["BTTMenuConfig"]["BTTMenuItemBackgroundType"], 4);
        assert_eq!(menu["BTTMenuConfig"]["BTTMenuItemBackgroundColor"], "40,40,40,230");
        assert_eq!(menu["BTTMenuConfig"]["BTTMenuCloseAfterAction"], 0);
        assert_eq!(menu["BTTAppBundleIdentifier"], "com.apple.Safari");
    }

    #[test]
    fn test_create_validation() {
        let small: CreateMenuArgs = args::parse(json!({"name": "x", "width": 10})).unwrap();
        assert!(small.validate().is_err());
        let opaque: CreateMenuArgs = args::parse(json!({"name": "x", "opacity": 1.5})).unwrap();
        assert!(opaque.validate().is_err());
        let unnamed: CreateMenuArgs = args::parse(json!({})).unwrap();
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_item_json() {
        let args: AddItemArgs = args::parse(json!({
            "menu_uuid": testing::UUID,
            "name": "Run",
            "sf_symbol_name": "gear",
            "icon_color": "255,255,255,255",
            "actions_json": "[{\"BTTPredefinedActionType\": 5}]"
        }))
        .unwrap();
        let item = args.item_json("ITEM").unwrap();
        assert_eq!(item["BTTTriggerType"], 773);
        assert_eq!(item["BTTTriggerParentUUID"], testing::UUID);
        assert_eq!(item["BTTMenuConfig"]["BTTMenuItemIconType"], 2);
        assert_eq!(item["BTTMenuConfig"]["BTTMenuItemCornerRadius"], 8);
        assert_eq!(item["BTTMenuItemActions"][0]["BTTPredefinedActionType"], 5);
    }

    #[tokio::test]
    async fn test_invalid_actions_json() {
        let result = AddFloatingMenuItemTool
            .execute(
                json!({"menu_uuid": testing::UUID, "name": "Run", "actions_json": "{not json"}),
                &testing::context(),
            )
            .await
            .unwrap();
        assert_eq!(
            result.first_text(),
            Some("Error: Invalid actions_json - must be a valid JSON array")
        );
        assert!(result.is_error);
    }

    #[test]
    fn test_visibility_actions() {
        let show = MenuVisibility::Show.action_json("M");
        assert_eq!(show["BTTPredefinedActionType"], 367);
        assert_eq!(show["BTTPredefinedActionName"], "Show Floating HTML Menu");
        assert_eq!(MenuVisibility::Toggle.action_type(), 369);

        let hide = MenuVisibilityTool(MenuVisibility::Hide).definition();
        assert_eq!(hide.name, "btt_hide_floating_menu");
        assert!(hide.annotations.unwrap().idempotent_hint);
        let toggle = MenuVisibilityTool(MenuVisibility::Toggle).definition();
        assert!(!toggle.annotations.unwrap().idempotent_hint);
    }

    #[test]
    fn test_created_prefers_btt_reply() {
        assert_eq!(created(" X \n".into(), "G".into()).first_text(), Some("X"));
        assert_eq!(created(String::new(), "G".into()).first_text(), Some("G"));
        assert!(created("Error: HTTP 500 - boom".into(), "G".into()).is_error);
    }
}
