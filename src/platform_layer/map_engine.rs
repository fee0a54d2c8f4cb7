/*
 * The narrow capability interface between a map engine and the controls it
 * hosts. An engine only needs to be able to register a control at a corner
 * and unregister it again; a control only needs to build its element when
 * mounted, release it when unmounted, and react to DOM events targeted at it.
 *
 * Controls are shared (`Rc<dyn MapControl>`) and take `&self` everywhere, so a
 * host callback running inside `handle_dom_event` can still unregister the
 * control it was called from.
 */
use super::color_scheme::{ColorSchemeProvider, FixedColorScheme};
use super::dom::{NodeId, SharedDocument};
use super::error::Result as PlatformResult;
use super::types::{ControlPosition, DomEvent, EngineFlavor};
use std::fmt;
use std::rc::Rc;

/*
 * The engine handle passed to a control when it is mounted: the document the
 * map lives in, the engine family, and the environment's color-scheme
 * preference.
 */
#[derive(Clone)]
pub struct MapHandle {
    pub document: SharedDocument,
    pub flavor: EngineFlavor,
    pub color_scheme: Rc<dyn ColorSchemeProvider>,
}

impl MapHandle {
    pub fn new(document: SharedDocument, flavor: EngineFlavor) -> Self {
        MapHandle {
            document,
            flavor,
            color_scheme: Rc::new(FixedColorScheme::new(false)),
        }
    }

    pub fn with_color_scheme(mut self, color_scheme: Rc<dyn ColorSchemeProvider>) -> Self {
        self.color_scheme = color_scheme;
        self
    }
}

impl fmt::Debug for MapHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapHandle")
            .field("flavor", &self.flavor)
            .field("prefers_dark", &self.color_scheme.prefers_dark())
            .finish_non_exhaustive()
    }
}

pub trait MapControl {
    // Builds the control's root element and returns it; the engine mounts it.
    fn on_add(&self, map: &MapHandle) -> PlatformResult<NodeId>;

    // Releases everything built by `on_add`. Must be safe to call at any time.
    fn on_remove(&self);

    // The currently mounted root, if any.
    fn root(&self) -> Option<NodeId>;

    fn handle_dom_event(&self, target: NodeId, event: &DomEvent);
}

pub type SharedControl = Rc<dyn MapControl>;

pub trait MapEngine {
    fn flavor(&self) -> EngineFlavor;

    fn add_control(&self, control: SharedControl, position: ControlPosition) -> PlatformResult<()>;

    fn remove_control(&self, control: &SharedControl) -> PlatformResult<()>;

    fn has_control(&self, control: &SharedControl) -> bool;
}
