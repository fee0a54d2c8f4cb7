/*
 * This module provides the application logic layer of the style switcher,
 * centered around `StyleSwitcherControl`: the collapsed/expanded state
 * machine, style selection with its before/after notifications, theme
 * resolution and the render procedure that applies a `SwitcherView` to the
 * element tree. `ControlState` holds the only mutable state of the control.
 * The `MapControl` adapter lives in `map_adapter.rs`; unit tests for the
 * control are in `switcher_control_tests.rs`.
 */
pub mod control_state;
pub mod error;
pub mod map_adapter;
pub mod switcher_control;
pub mod ui_constants;


pub use control_state::{ControlState, Diagnostic};
pub use error::SwitcherError;
pub use switcher_control::{ControlEvent, StyleSwitcherControl};
