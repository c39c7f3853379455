//! The keyword-to-section table behind `btt_lookup_reference`.

use std::fmt;

/// A bundled reference document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocKey {
    /// Trigger JSON format.
    Triggers,
    /// CLI / socket commands.
    Cli,
    /// Standard and condition variables.
    Variables,
    /// Predefined actions.
    Actions,
}

impl DocKey {
    /// All documents.
    pub const ALL: [DocKey; 4] = [DocKey::Triggers, DocKey::Cli, DocKey::Variables, DocKey::Actions];

    /// File name inside the docs directory.
    pub fn file_name(self) -> &'static str {
        match self {
            DocKey::Triggers => "btt_trigger_docs.md",
            DocKey::Cli => "btt_cli_docs.md",
            DocKey::Variables => "btt_vars_docs.md",
            DocKey::Actions => "btt_cli_actions_docs.md",
        }
    }

    /// Source label shown above each returned section.
    pub fn label(self) -> &'static str {
        match self {
            DocKey::Triggers => "Trigger JSON Reference",
            DocKey::Cli => "CLI Command Reference",
            DocKey::Variables => "Variables Reference",
            DocKey::Actions => "Actions Reference",
        }
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            DocKey::Triggers => "triggers",
            DocKey::Cli => "cli",
            DocKey::Variables => "variables",
            DocKey::Actions => "actions",
        };
        f.write_str(key)
    }
}

/// Catalog grouping of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Trigger JSON construction.
    TriggerCreation,
    /// CLI commands and actions.
    CliActions,
    /// BTT variables.
    Variables,
}

impl Category {
    /// Catalog order.
    pub const ALL: [Category; 3] = [
        Category::TriggerCreation,
        Category::CliActions,
        Category::Variables,
    ];

    /// Heading used in the catalog.
    pub fn title(self) -> &'static str {
        match self {
            Category::TriggerCreation => "Trigger Creation",
            Category::CliActions => "CLI & Actions",
            Category::Variables => "Variables",
        }
    }
}

/// Maps a set of keywords to one section of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionEntry {
    /// Lowercase keyword phrases (may contain spaces).
    pub keywords: &'static [&'static str],
    /// Document holding the section.
    pub doc: DocKey,
    /// Regex matched against the start of a trimmed line.
    pub heading: &'static str,
    /// Catalog group.
    pub category: Category,
    /// Topic names advertised in the catalog.
    pub topics: &'static [&'static str],
    /// One-line catalog description.
    pub summary: &'static str,
}

macro_rules! entry {
    ($category:ident, $doc:ident, $heading:literal, [$($kw:literal),+ $(,)?], [$($topic:literal),+], $summary:literal) => {
        SectionEntry {
            keywords: &[$($kw),+],
            doc: DocKey::$doc,
            heading: $heading,
            category: Category::$category,
            topics: &[$($topic),+],
            summary: $summary,
        }
    };
}

/// Built-in section table.
pub static SECTION_INDEX: &[SectionEntry] = &[
    // Trigger JSON
    entry!(TriggerCreation, Triggers, r"^# BetterTouchTool Trigger JSON Reference$",
        ["trigger structure", "required fields", "basic trigger", "trigger json"],
        ["trigger structure", "required fields"],
        "Basic trigger JSON format and required fields"),
    entry!(TriggerCreation, Triggers, r"^### 3\.\s*Other Triggers",
        ["named trigger", "reusable trigger", "named"],
        ["named trigger"],
        "Named/reusable trigger creation (BTTTriggerType 643)"),
    entry!(TriggerCreation, Triggers, r"^### 4\.\s*Keyboard Shortcuts",
        ["keyboard shortcut", "keyboard", "shortcut", "hotkey", "key combo"],
        ["keyboard shortcut"],
        "Keyboard shortcut triggers with key codes and modifiers"),
    entry!(TriggerCreation, Triggers, r"^### 5\.\s*Key Sequences",
        ["key sequence", "typed word", "key seq"],
        ["key sequence"],
        "Key sequence / typed word triggers"),
    entry!(TriggerCreation, Triggers, r"^### 1\.\s*Trackpad Gestures",
        ["trackpad", "gesture", "swipe", "pinch", "tap"],
        ["trackpad", "gesture"],
        "Trackpad gesture trigger types"),
    entry!(TriggerCreation, Triggers, r"^### 2\.\s*Magic Mouse",
        ["magic mouse", "mouse gesture"],
        ["magic mouse"],
        "Magic Mouse gesture triggers"),
    entry!(TriggerCreation, Triggers, r"^### 9\.\s*Touch Bar",
        ["touch bar", "touchbar"],
        ["touch bar"],
        "Touch Bar button triggers"),
    entry!(TriggerCreation, Triggers, r"^### 10\.\s*Stream Deck",
        ["stream deck", "streamdeck"],
        ["stream deck"],
        "Stream Deck triggers"),
    entry!(TriggerCreation, Triggers, r"^### 11\.\s*Notch Bar",
        ["notch bar", "notchbar"],
        ["notch bar"],
        "Notch Bar triggers"),
    entry!(TriggerCreation, Triggers, r"^### 12\.\s*Floating Menu",
        ["floating menu", "menu item"],
        ["floating menu"],
        "Floating menu triggers"),
    entry!(TriggerCreation, Triggers, r"^### 13\.\s*MIDI",
        ["midi"],
        ["midi"],
        "MIDI triggers"),
    entry!(TriggerCreation, Triggers, r"^### 8\.\s*Siri Remote",
        ["siri remote", "apple tv remote"],
        ["siri remote"],
        "Siri Remote triggers"),
    entry!(TriggerCreation, Triggers, r"^### 6\.\s*Drawings",
        ["drawing"],
        ["drawing"],
        "Drawing gesture triggers"),
    entry!(TriggerCreation, Triggers, r"^### Modifier Keys",
        ["modifier", "modifier key", "command", "option", "control", "shift"],
        ["modifier"],
        "Modifier key codes (Cmd, Opt, Ctrl, Shift)"),
    entry!(TriggerCreation, Triggers, r"^## Special Configurations",
        ["color", "rgba", "icon", "sf symbol"],
        ["color", "icon"],
        "Color format and icon configuration"),
    entry!(TriggerCreation, Triggers, r"^## Complete Examples",
        ["example", "complete example", "sample"],
        ["example"],
        "Complete trigger JSON examples"),
    entry!(TriggerCreation, Triggers, r"^## Tips",
        ["tips", "best practice"],
        ["tips"],
        "Best practices for trigger JSON"),
    // CLI
    entry!(CliActions, Cli, r"^## Overview",
        ["cli", "socket", "bttcli", "command line"],
        ["cli"],
        "CLI/socket overview and command format"),
    entry!(CliActions, Cli, r"^### 24\.\s*trigger_action",
        ["trigger_action", "trigger action", "execute action"],
        ["trigger action"],
        "trigger_action CLI command"),
    entry!(CliActions, Cli, r"^### 26\.\s*trigger_named",
        ["trigger_named", "trigger named", "call named"],
        ["trigger named"],
        "trigger_named CLI command"),
    entry!(CliActions, Cli, r"^### 33\.\s*add_new_trigger",
        ["add_new_trigger", "add trigger", "create trigger"],
        ["add trigger", "create trigger"],
        "add_new_trigger CLI command"),
    entry!(CliActions, Cli, r"^### 36\.\s*update_trigger",
        ["update_trigger", "update trigger", "modify trigger"],
        ["update trigger"],
        "update_trigger CLI command"),
    entry!(CliActions, Cli, r"^### 6\.\s*display_notification",
        ["notification", "display_notification"],
        ["notification"],
        "display_notification command"),
    entry!(CliActions, Cli, r"^### 2\.\s*get_clipboard_content",
        ["clipboard", "paste"],
        ["clipboard"],
        "Clipboard commands"),
    entry!(CliActions, Cli, r"^### 12\.\s*set_persistent_string_variable",
        ["variable", "set variable", "get variable", "string variable", "number variable"],
        ["variable"],
        "Variable get/set commands"),
    entry!(CliActions, Cli, r"^### 40\.\s*refresh_widget",
        ["widget", "update widget", "touch bar widget", "stream deck widget"],
        ["widget"],
        "Widget update commands"),
    // Actions
    entry!(CliActions, Actions, r"^# BetterTouchTool Predefined Actions$",
        ["predefined action", "action ids", "action json"],
        ["predefined action", "action ids"],
        "Predefined action JSON structure and action IDs"),
    // Variables
    entry!(Variables, Variables, r"^# \[Available Standard Variables\]",
        ["variable list", "dynamic variable", "available variable", "btt variable"],
        ["variable list", "dynamic variable"],
        "All available BTT variables"),
    entry!(Variables, Variables, r"^## Advanced Trigger Condition Variables",
        ["condition variable", "trigger condition", "activation group"],
        ["condition variable"],
        "Advanced trigger condition variables"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keywords_are_lowercase() {
        for entry in SECTION_INDEX {
            for kw in entry.keywords {
                assert_eq!(*kw, kw.to_lowercase(), "keyword {kw:?} must be lowercase");
            }
        }
    }

    #[test]
    fn test_no_duplicate_sections() {
        let mut seen = HashSet::new();
        for entry in SECTION_INDEX {
            assert!(seen.insert((entry.doc, entry.heading)), "{}", entry.heading);
        }
    }

    #[test]
    fn test_every_document_is_indexed() {
        for doc in DocKey::ALL {
            assert!(
                SECTION_INDEX.iter().any(|e| e.doc == doc),
                "{doc} has no entry"
            );
        }
    }

    #[test]
    fn test_doc_metadata() {
        assert_eq!(DocKey::Variables.file_name(), "btt_vars_docs.md");
        assert_eq!(DocKey::Cli.label(), "CLI Command Reference");
        assert_eq!(DocKey::Actions.to_string(), "actions");
    }
}
