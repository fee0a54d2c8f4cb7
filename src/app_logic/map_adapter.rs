/*
 * Lets a `StyleSwitcherControl` be registered with any `MapEngine`. The
 * adapter holds no state of its own: mounting attaches, unmounting detaches
 * and DOM events are translated and handed to the control.
 */
use super::switcher_control::StyleSwitcherControl;
use crate::platform_layer::{DomEvent, MapControl, MapHandle, NodeId, PlatformResult};

impl MapControl for StyleSwitcherControl {
    fn on_add(&self, map: &MapHandle) -> PlatformResult<NodeId> {
        self.attach(map)
    }

    fn on_remove(&self) {
        self.detach();
    }

    fn root(&self) -> Option<NodeId> {
        StyleSwitcherControl::root(self)
    }

    fn handle_dom_event(&self, target: NodeId, event: &DomEvent) {
        match self.event_for_target(target, event) {
            Some(control_event) => {
                self.handle_event(control_event);
            }
            None => log::trace!("StyleSwitcher: {event:?} on {target:?} not handled"),
        }
    }
}
