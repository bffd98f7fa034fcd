use bevy::prelude::*;
use once_cell::sync::Lazy;
use serde::Deserialize;

const DEFAULT_SETTINGS_JSON: &str = include_str!("./content/registry_settings.json");

static DEFAULT_SETTINGS: Lazy<ScreenRegistrySettings> = Lazy::new(|| {
    match ScreenRegistrySettings::from_json(DEFAULT_SETTINGS_JSON) {
        Ok(settings) => settings,
        Err(error) => {
            warn!("failed to parse screen registry settings: {error}; using safe defaults");
            ScreenRegistrySettings::fallback()
        }
    }
});

/// What a scan does when two widgets of one kind share a name.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNamePolicy {
    /// Abort the build with `RegistryError::DuplicateName`.
    #[default]
    Fail,
    /// Keep the widget found first in traversal order.
    KeepFirst,
    /// Keep the widget found last in traversal order.
    Overwrite,
}

#[derive(Resource, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRegistrySettings {
    /// Scan hidden subtrees too, so widgets toggled off stay addressable.
    #[serde(default = "include_inactive_default")]
    pub include_inactive: bool,
    #[serde(default)]
    pub duplicate_names: DuplicateNamePolicy,
}

fn include_inactive_default() -> bool {
    true
}

impl ScreenRegistrySettings {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    fn fallback() -> Self {
        Self {
            include_inactive: true,
            duplicate_names: DuplicateNamePolicy::Fail,
        }
    }
}

impl Default for ScreenRegistrySettings {
    fn default() -> Self {
        *DEFAULT_SETTINGS
    }
}
