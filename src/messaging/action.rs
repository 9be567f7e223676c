//! Cross-context action names.

use std::fmt;

/// Context that handles an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// The extension's background worker.
    Background,
    /// The script running inside a page.
    Page,
}

/// Message action identifier.
///
/// Unknown names are captured so they can be reported back to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// List built-in and custom patterns.
    GetPatterns,
    /// Upsert a custom pattern.
    SaveCustomPattern,
    /// Delete a custom pattern by id.
    DeleteCustomPattern,
    /// Open the picker on the page's current field.
    ShowPromptPicker,
    /// Append a pattern to the page's focused field.
    InsertPrompt,
    /// Enable or disable the current site.
    ToggleSite,
    /// Enable or disable the extension everywhere.
    ToggleExtension,
    /// Anything else.
    Unknown(String),
}

impl Action {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::GetPatterns => "getPatterns",
            Self::SaveCustomPattern => "saveCustomPattern",
            Self::DeleteCustomPattern => "deleteCustomPattern",
            Self::ShowPromptPicker => "showPromptPicker",
            Self::InsertPrompt => "insertPrompt",
            Self::ToggleSite => "toggleSite",
            Self::ToggleExtension => "toggleExtension",
            Self::Unknown(s) => s.as_str(),
        }
    }

    /// Returns true for a recognised action.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Context that handles the action, if known.
    #[must_use]
    pub const fn context(&self) -> Option<Context> {
        match self {
            Self::GetPatterns | Self::SaveCustomPattern | Self::DeleteCustomPattern => {
                Some(Context::Background)
            },
            Self::ShowPromptPicker
            | Self::InsertPrompt
            | Self::ToggleSite
            | Self::ToggleExtension => Some(Context::Page),
            Self::Unknown(_) => None,
        }
    }

    /// All known actions.
    #[must_use]
    pub const fn known_actions() -> &'static [Self] {
        &[
            Self::GetPatterns,
            Self::SaveCustomPattern,
            Self::DeleteCustomPattern,
            Self::ShowPromptPicker,
            Self::InsertPrompt,
            Self::ToggleSite,
            Self::ToggleExtension,
        ]
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        match s {
            "getPatterns" => Self::GetPatterns,
            "saveCustomPattern" => Self::SaveCustomPattern,
            "deleteCustomPattern" => Self::DeleteCustomPattern,
            "showPromptPicker" => Self::ShowPromptPicker,
            "insertPrompt" => Self::InsertPrompt,
            "toggleSite" => Self::ToggleSite,
            "toggleExtension" => Self::ToggleExtension,
            unknown => Self::Unknown(unknown.to_string()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global keyboard shortcut forwarded by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shortcut {
    /// `insert_prompt`: open the picker on the active page.
    InsertPrompt,
    /// `toggle_extension`: flip the global switch.
    ToggleExtension,
    /// Any other command id.
    Unknown(String),
}

impl Shortcut {
    /// Returns the command id.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::InsertPrompt => "insert_prompt",
            Self::ToggleExtension => "toggle_extension",
            Self::Unknown(s) => s.as_str(),
        }
    }
}

impl From<&str> for Shortcut {
    fn from(s: &str) -> Self {
        match s {
            "insert_prompt" => Self::InsertPrompt,
            "toggle_extension" => Self::ToggleExtension,
            unknown => Self::Unknown(unknown.to_string()),
        }
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
