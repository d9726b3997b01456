use std::fmt;

use serde::Serialize;

/// The dashboard's top-level panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Dashboard,
    Models,
    Voice,
    Face,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Self::Dashboard, Self::Models, Self::Voice, Self::Face];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Models => "models",
            Self::Voice => "voice",
            Self::Face => "face",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
