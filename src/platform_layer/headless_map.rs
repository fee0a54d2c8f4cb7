/*
 * An in-memory map engine implementing the control-registration protocol of
 * MapLibre GL / Mapbox GL: a map container with a control container holding
 * one slot per corner. Controls anchored at a bottom corner are inserted
 * first in their slot, the others are appended, as the real engines do.
 *
 * `HeadlessMap` also records the style URL applied by the host, so demos and
 * tests can observe the effect of a style switch, and routes DOM events to the
 * control whose element contains the event target.
 */
use super::color_scheme::{ColorSchemeProvider, FixedColorScheme};
use super::dom::{Document, NodeId, SharedDocument};
use super::error::{PlatformError, Result as PlatformResult};
use super::map_engine::{MapControl, MapEngine, MapHandle, SharedControl};
use super::types::{ControlPosition, DomEvent, EngineFlavor};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

struct MountedControl {
    control: SharedControl,
    position: ControlPosition,
    root: NodeId,
}

pub struct HeadlessMap {
    handle: MapHandle,
    container: NodeId,
    slots: HashMap<ControlPosition, NodeId>,
    controls: RefCell<Vec<MountedControl>>,
    style_history: RefCell<Vec<String>>,
}

impl HeadlessMap {
    pub fn new(flavor: EngineFlavor) -> Self {
        Self::with_color_scheme(flavor, Rc::new(FixedColorScheme::new(false)))
    }

    pub fn with_color_scheme(flavor: EngineFlavor, color_scheme: Rc<dyn ColorSchemeProvider>) -> Self {
        let document = Document::shared();
        let prefix = flavor.css_prefix();
        let (container, slots) = {
            let mut doc = document.borrow_mut();
            let container = doc.create_element("div");
            let control_container = doc.create_element("div");
            let mut slots = HashMap::new();
            // These only fail for unknown nodes, and every node here is fresh.
            let _ = doc.set_class_name(container, &format!("{prefix}-map"));
            let _ = doc.set_class_name(control_container, &format!("{prefix}-control-container"));
            let _ = doc.append_child(container, control_container);
            for position in ControlPosition::ALL {
                let slot = doc.create_element("div");
                let _ = doc.set_class_name(slot, &flavor.slot_class(position));
                let _ = doc.append_child(control_container, slot);
                slots.insert(position, slot);
            }
            (container, slots)
        };
        log::debug!("HeadlessMap: created {flavor:?} map container {container:?}");
        HeadlessMap {
            handle: MapHandle::new(document, flavor).with_color_scheme(color_scheme),
            container,
            slots,
            controls: RefCell::new(Vec::new()),
            style_history: RefCell::new(Vec::new()),
        }
    }

    pub fn handle(&self) -> &MapHandle {
        &self.handle
    }

    pub fn document(&self) -> SharedDocument {
        Rc::clone(&self.handle.document)
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn slot(&self, position: ControlPosition) -> NodeId {
        self.slots[&position]
    }

    // Root elements currently mounted at `position`, in slot order.
    pub fn controls_at(&self, position: ControlPosition) -> Vec<NodeId> {
        self.handle
            .document
            .borrow()
            .children(self.slot(position))
            .map(<[NodeId]>::to_vec)
            .unwrap_or_default()
    }

    pub fn control_count(&self) -> usize {
        self.controls.borrow().len()
    }

    pub fn position_of(&self, control: &SharedControl) -> Option<ControlPosition> {
        self.controls
            .borrow()
            .iter()
            .find(|mounted| Rc::ptr_eq(&mounted.control, control))
            .map(|mounted| mounted.position)
    }

    // --- Style ---

    pub fn set_style(&self, style_url: &str) {
        log::debug!("HeadlessMap: setStyle({style_url})");
        self.style_history.borrow_mut().push(style_url.to_string());
    }

    pub fn style_url(&self) -> Option<String> {
        self.style_history.borrow().last().cloned()
    }

    pub fn style_history(&self) -> Vec<String> {
        self.style_history.borrow().clone()
    }

    // --- Events ---

    /*
     * Delivers `event` to the mounted control whose element contains
     * `target`. Returns false when no control owns the target. No borrow of
     * the map is held while the control runs, so host callbacks may call back
     * into the map.
     */
    pub fn dispatch_event(&self, target: NodeId, event: DomEvent) -> bool {
        let owner = {
            let doc = self.handle.document.borrow();
            self.controls
                .borrow()
                .iter()
                .find(|mounted| doc.is_ancestor_or_self(mounted.root, target))
                .map(|mounted| Rc::clone(&mounted.control))
        };
        match owner {
            Some(control) => {
                log::trace!("HeadlessMap: dispatching {event:?} to control at {target:?}");
                control.handle_dom_event(target, &event);
                true
            }
            None => {
                log::trace!("HeadlessMap: no control owns {target:?}, dropping {event:?}");
                false
            }
        }
    }
}

impl MapEngine for HeadlessMap {
    fn flavor(&self) -> EngineFlavor {
        self.handle.flavor
    }

    fn add_control(&self, control: SharedControl, position: ControlPosition) -> PlatformResult<()> {
        if self.has_control(&control) {
            return Err(PlatformError::ControlAlreadyRegistered);
        }
        let root = control.on_add(&self.handle)?;
        {
            let mut doc = self.handle.document.borrow_mut();
            let slot = self.slot(position);
            let mounted = match position {
                ControlPosition::BottomLeft | ControlPosition::BottomRight => {
                    doc.prepend_child(slot, root)
                }
                ControlPosition::TopLeft | ControlPosition::TopRight => doc.append_child(slot, root),
            };
            if let Err(e) = mounted {
                drop(doc);
                log::error!("HeadlessMap: failed to mount control root {root:?}: {e}");
                control.on_remove();
                return Err(e);
            }
        }
        self.controls.borrow_mut().push(MountedControl {
            control,
            position,
            root,
        });
        log::debug!("HeadlessMap: control {root:?} added at {position}");
        Ok(())
    }

    fn remove_control(&self, control: &SharedControl) -> PlatformResult<()> {
        let removed = {
            let mut controls = self.controls.borrow_mut();
            let index = controls
                .iter()
                .position(|mounted| Rc::ptr_eq(&mounted.control, control))
                .ok_or(PlatformError::ControlNotRegistered)?;
            controls.remove(index)
        };
        removed.control.on_remove();
        log::debug!(
            "HeadlessMap: control {:?} removed from {}",
            removed.root,
            removed.position
        );
        Ok(())
    }

    fn has_control(&self, control: &SharedControl) -> bool {
        self.controls
            .borrow()
            .iter()
            .any(|mounted| Rc::ptr_eq(&mounted.control, control))
    }
}

impl fmt::Debug for HeadlessMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessMap")
            .field("flavor", &self.handle.flavor)
            .field("container", &self.container)
            .field("controls", &self.control_count())
            .field("style_url", &self.style_url())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    // A control that mounts a bare <div> and counts lifecycle calls.
    struct MockControl {
        document: RefCell<Option<SharedDocument>>,
        root: Cell<Option<NodeId>>,
        removed: Cell<usize>,
        events: RefCell<Vec<(NodeId, DomEvent)>>,
    }

    impl MockControl {
        fn new() -> Rc<Self> {
            Rc::new(MockControl {
                document: RefCell::new(None),
                root: Cell::new(None),
                removed: Cell::new(0),
                events: RefCell::new(Vec::new()),
            })
        }
    }

    impl MapControl for MockControl {
        fn on_add(&self, map: &MapHandle) -> PlatformResult<NodeId> {
            let root = map.document.borrow_mut().create_element("div");
            self.root.set(Some(root));
            *self.document.borrow_mut() = Some(Rc::clone(&map.document));
            Ok(root)
        }

        fn on_remove(&self) {
            self.removed.set(self.removed.get() + 1);
            if let (Some(root), Some(doc)) = (self.root.take(), self.document.borrow().as_ref()) {
                let _ = doc.borrow_mut().remove_subtree(root);
            }
        }

        fn root(&self) -> Option<NodeId> {
            self.root.get()
        }

        fn handle_dom_event(&self, target: NodeId, event: &DomEvent) {
            self.events.borrow_mut().push((target, event.clone()));
        }
    }

    #[test]
    fn test_new_map_has_four_slots() {
        let map = HeadlessMap::new(EngineFlavor::Mapbox);
        let doc = map.document();
        let doc = doc.borrow();
        assert!(doc.has_class(map.container(), "mapboxgl-map"));
        for position in ControlPosition::ALL {
            assert!(doc.has_class(map.slot(position), &format!("mapboxgl-ctrl-{position}")));
        }
    }

    #[test]
    fn test_add_and_remove_control() {
        let map = HeadlessMap::new(EngineFlavor::MapLibre);
        let mock = MockControl::new();
        let control: SharedControl = mock.clone();

        map.add_control(Rc::clone(&control), ControlPosition::TopRight)
            .unwrap();
        let root = mock.root().unwrap();
        assert_eq!(map.controls_at(ControlPosition::TopRight), vec![root]);
        assert_eq!(map.position_of(&control), Some(ControlPosition::TopRight));
        assert_eq!(
            map.add_control(Rc::clone(&control), ControlPosition::TopLeft),
            Err(PlatformError::ControlAlreadyRegistered)
        );

        map.remove_control(&control).unwrap();
        assert_eq!(mock.removed.get(), 1);
        assert!(map.controls_at(ControlPosition::TopRight).is_empty());
        assert_eq!(
            map.remove_control(&control),
            Err(PlatformError::ControlNotRegistered)
        );
    }

    #[test]
    fn test_bottom_controls_are_prepended() {
        let map = HeadlessMap::new(EngineFlavor::MapLibre);
        let first = MockControl::new();
        let second = MockControl::new();
        map.add_control(first.clone(), ControlPosition::BottomLeft)
            .unwrap();
        map.add_control(second.clone(), ControlPosition::BottomLeft)
            .unwrap();
        assert_eq!(
            map.controls_at(ControlPosition::BottomLeft),
            vec![second.root().unwrap(), first.root().unwrap()]
        );
    }

    #[test]
    fn test_dispatch_routes_to_owning_control() {
        let map = HeadlessMap::new(EngineFlavor::MapLibre);
        let mock = MockControl::new();
        map.add_control(mock.clone(), ControlPosition::TopLeft)
            .unwrap();
        let root = mock.root().unwrap();
        let child = {
            let doc = map.document();
            let mut doc = doc.borrow_mut();
            let child = doc.create_element("span");
            doc.append_child(root, child).unwrap();
            child
        };

        assert!(map.dispatch_event(child, DomEvent::Click));
        assert!(!map.dispatch_event(map.container(), DomEvent::Click));
        assert_eq!(*mock.events.borrow(), vec![(child, DomEvent::Click)]);
    }

    #[test]
    fn test_style_history() {
        let map = HeadlessMap::new(EngineFlavor::MapLibre);
        assert!(map.style_url().is_none());
        map.set_style("a.json");
        map.set_style("b.json");
        assert_eq!(map.style_url().as_deref(), Some("b.json"));
        assert_eq!(map.style_history(), vec!["a.json", "b.json"]);
    }
}
