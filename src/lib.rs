/*
 * A headless basemap style-switcher control for MapLibre/Mapbox style map
 * engines. The crate is layered the same way as a desktop application:
 *
 * - `model` holds the platform-agnostic data (style catalog, options, theme
 *   resolution, JSON configuration).
 * - `platform_layer` stands in for the browser and the map engine: a retained
 *   element tree, DOM events, the map-engine capability traits, the OS
 *   color-scheme provider and an in-memory `HeadlessMap`.
 * - `ui_description_layer` describes what the control shows for a given state.
 * - `app_logic` owns the control's state machine and applies the description
 *   to the element tree.
 * - `bindings` adapts the control to declarative UI lifecycles (hook-style and
 *   component-style).
 */
pub mod app_logic;
pub mod bindings;
pub mod model;
pub mod platform_layer;
pub mod ui_description_layer;

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::sync::Once;

pub use app_logic::{ControlEvent, Diagnostic, StyleSwitcherControl, SwitcherError};
pub use bindings::{StyleSwitcherComponent, StyleSwitcherHook, StyleSwitcherProps};
pub use model::{
    ClassNames, ClassNamesOverride, OptionsUpdate, ResolvedTheme, StyleCatalog,
    StyleChangeCallback, StyleDescriptor, SwitcherOptions, ThemeMode,
};
pub use platform_layer::{
    ControlPosition, Document, DomEvent, EngineFlavor, HeadlessMap, MapControl, MapEngine,
    MapHandle, NodeId, PlatformError, PlatformResult,
};

static LOGGING_INIT: Once = Once::new();

/*
 * Installs the terminal logger used by the demo binary and by the tests.
 * Safe to call any number of times; only the first call has an effect. If
 * another logger was already installed by the host, that one is kept.
 */
pub fn initialize_logging() {
    LOGGING_INIT.call_once(|| {
        let config = ConfigBuilder::new()
            .set_thread_level(LevelFilter::Off)
            .set_target_level(LevelFilter::Error)
            .build();
        if let Err(e) = TermLogger::init(
            LevelFilter::Debug,
            config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ) {
            eprintln!("Logging already initialized: {e}");
        }
    });
}
