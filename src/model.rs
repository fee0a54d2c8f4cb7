/*
 * This module consolidates the platform-agnostic data of the style switcher:
 * the style catalog supplied by the host, the control options (with their
 * partial-update form), theme resolution, and loading of JSON configuration
 * files. Nothing in here touches the element tree or the map engine.
 */
pub mod config;
pub mod options;
pub mod style_catalog;
pub mod theme;

pub use config::{ConfigError, SwitcherConfigFile, load_config, parse_config};
pub use options::{
    ClassNames, ClassNamesOverride, OptionsError, OptionsUpdate, StyleChangeCallback,
    SwitcherOptions,
};
pub use style_catalog::{CatalogIssue, StyleCatalog, StyleDescriptor};
pub use theme::{ResolvedTheme, ThemeMode, resolve_theme};
