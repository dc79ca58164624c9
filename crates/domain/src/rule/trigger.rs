//! Soft trigger — a manually activated event condition.
//!
//! Soft triggers are fired by a human (UI button, client call) rather than
//! by sensor input. They carry a display name and one of the remote
//! system's predefined icon identifiers; they have no behavior of their own.

use serde::{Deserialize, Serialize};

/// A named, manually activated trigger condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftTrigger {
    pub name: String,
    #[serde(default)]
    pub icon: TriggerIcon,
}

impl SoftTrigger {
    /// Create a trigger with the default icon.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: TriggerIcon::default(),
        }
    }

    /// Create a trigger with an explicit icon.
    #[must_use]
    pub fn with_icon(name: impl Into<String>, icon: TriggerIcon) -> Self {
        Self {
            name: name.into(),
            icon,
        }
    }
}

impl std::fmt::Display for SoftTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "soft_trigger({}, {})", self.name, self.icon)
    }
}

/// Icon identifiers the remote system recognises for soft triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerIcon {
    #[default]
    Bell,
    LightsOn,
    LightsOff,
    Siren,
    DoorOpened,
    Megaphone,
}

impl std::fmt::Display for TriggerIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Bell => "bell",
            Self::LightsOn => "lights_on",
            Self::LightsOff => "lights_off",
            Self::Siren => "siren",
            Self::DoorOpened => "door_opened",
            Self::Megaphone => "megaphone",
        };
        f.write_str(name)
    }
}
