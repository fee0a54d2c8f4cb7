/*
 * The platform layer stands in for everything the style switcher does not
 * own: the browser's element tree and events, the OS color-scheme preference,
 * and the host map engine's control-registration protocol. `HeadlessMap` is a
 * complete in-memory engine used by the demo binary and the tests.
 */
pub mod color_scheme;
pub mod dom;
pub mod error;
pub mod headless_map;
pub mod map_engine;
pub mod types;

pub use color_scheme::{
    ColorSchemeListener, ColorSchemeProvider, FixedColorScheme, ManualColorScheme, SubscriptionId,
};
pub use dom::{Document, NodeId, SharedDocument};
pub use error::{PlatformError, Result as PlatformResult};
pub use headless_map::HeadlessMap;
pub use map_engine::{MapControl, MapEngine, MapHandle, SharedControl};
pub use types::{ControlPosition, DomEvent, EngineFlavor};
