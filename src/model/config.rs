/*
 * Loads a style switcher configuration from a JSON document: the style
 * catalog plus any of the serialisable options and the anchor position. Keys
 * use the camelCase names of the MapLibre style-switcher options object, so
 * existing configuration snippets can be reused as-is.
 *
 * Callbacks cannot be expressed in JSON; the host attaches them to the
 * `SwitcherOptions` produced by `SwitcherConfigFile::into_options`.
 */
use super::options::{ClassNamesOverride, SwitcherOptions};
use super::style_catalog::StyleCatalog;
use super::theme::ThemeMode;
use crate::platform_layer::ControlPosition;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Configuration parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitcherConfigFile {
    pub styles: StyleCatalog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_style_id: Option<String>,
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "default_true")]
    pub show_labels: bool,
    #[serde(default = "default_true")]
    pub show_images: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    #[serde(default)]
    pub rtl: bool,
    #[serde(default)]
    pub class_names: ClassNamesOverride,
    #[serde(default)]
    pub position: ControlPosition,
}

fn default_true() -> bool {
    true
}

impl SwitcherConfigFile {
    /*
     * Converts the file contents into control options plus the anchor
     * position. Validation is left to the control constructor so that a file
     * and a hand-built `SwitcherOptions` fail the same way.
     */
    pub fn into_options(self) -> (SwitcherOptions, ControlPosition) {
        let mut options = SwitcherOptions::new(self.styles)
            .theme(self.theme)
            .show_labels(self.show_labels)
            .show_images(self.show_images)
            .rtl(self.rtl)
            .class_names(self.class_names);
        options.active_style_id = self.active_style_id;
        if let Some(millis) = self.animation_duration {
            options.animation_duration = millis;
        }
        if let Some(pixels) = self.max_height {
            options.max_height = pixels;
        }
        (options, self.position)
    }
}

pub fn parse_config(json: &str) -> Result<SwitcherConfigFile> {
    let config: SwitcherConfigFile = serde_json::from_str(json)?;
    log::debug!(
        "Parsed switcher configuration with {} style(s).",
        config.styles.len()
    );
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<SwitcherConfigFile> {
    log::trace!("Loading switcher configuration from {path:?}");
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: SwitcherConfigFile = serde_json::from_reader(reader)?;
    log::debug!(
        "Loaded switcher configuration from {path:?} with {} style(s).",
        config.styles.len()
    );
    Ok(config)
}
