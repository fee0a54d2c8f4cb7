/*
 * Adapters between the style switcher and declarative UI lifecycles. Neither
 * binding re-implements any control behavior; both only decide when to build,
 * register, update and unregister a `StyleSwitcherControl`.
 *
 * - `StyleSwitcherHook` rebuilds the control whenever the map, the position or
 *   the serialisable options change.
 * - `StyleSwitcherComponent` builds the control once and routes later prop
 *   changes through `update_options`; callbacks go through `CallbackCell`s so
 *   a new callback identity never forces a rebuild.
 */
pub mod callback_cell;
pub mod component;
pub mod hook;

pub use callback_cell::CallbackCell;
pub use component::{StyleSwitcherComponent, StyleSwitcherProps, StyleUrlCallback};
pub use hook::StyleSwitcherHook;
