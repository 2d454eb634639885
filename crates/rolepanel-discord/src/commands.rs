//! Slash-command definitions for the operator surface.

use serde_json::{json, Value};

pub const COMMAND_CREATE_PANEL: &str = "createpanel";
pub const COMMAND_EDIT_PANEL: &str = "editpanel";

const OPTION_TYPE_STRING: u8 = 3;

/// The two operator commands, in bulk-overwrite payload form.
pub fn command_definitions() -> Value {
    json!([
        {
            "name": COMMAND_CREATE_PANEL,
            "description": "Create a custom reaction role panel",
            "options": [
                {
                    "type": OPTION_TYPE_STRING,
                    "name": "title",
                    "description": "Title of the panel",
                    "required": true
                },
                {
                    "type": OPTION_TYPE_STRING,
                    "name": "description",
                    "description": "Description shown in the embed",
                    "required": true
                },
                {
                    "type": OPTION_TYPE_STRING,
                    "name": "roles",
                    "description": "Comma-separated emoji:roleID pairs (e.g. ✅:1234,🔴:5678)",
                    "required": true
                }
            ]
        },
        {
            "name": COMMAND_EDIT_PANEL,
            "description": "Add roles to an existing reaction role panel",
            "options": [
                {
                    "type": OPTION_TYPE_STRING,
                    "name": "messageid",
                    "description": "ID of the panel message to edit",
                    "required": true
                },
                {
                    "type": OPTION_TYPE_STRING,
                    "name": "roles",
                    "description": "Comma-separated emoji:roleID pairs to add (e.g. ✅:1234,🔴:5678)",
                    "required": true
                }
            ]
        }
    ])
}
