/*
 * The component-style binding. `mount` builds and registers the control once;
 * `set_props` diffs the new props against the last ones and forwards only the
 * changed fields through `update_options`. The before/after callbacks and
 * `on_style_change` live in `CallbackCell`s read by fixed trampolines, so
 * replacing a callback never touches the control. A position change moves the
 * same control instance to the new corner.
 */
use super::callback_cell::CallbackCell;
use crate::app_logic::{StyleSwitcherControl, SwitcherError};
use crate::model::{
    ClassNames, OptionsUpdate, StyleChangeCallback, StyleDescriptor, SwitcherOptions,
};
use crate::platform_layer::{ControlPosition, MapEngine, PlatformError, SharedControl};
use std::fmt;
use std::rc::Rc;

// Receives the style URL of the newly selected style.
pub type StyleUrlCallback = Rc<dyn Fn(&str)>;

type StyleChangeFn = dyn Fn(&StyleDescriptor, &StyleDescriptor);
type StyleUrlFn = dyn Fn(&str);

#[derive(Clone)]
pub struct StyleSwitcherProps {
    pub options: SwitcherOptions,
    pub position: ControlPosition,
    pub on_style_change: Option<StyleUrlCallback>,
}

impl StyleSwitcherProps {
    pub fn new(options: SwitcherOptions) -> Self {
        StyleSwitcherProps {
            options,
            position: ControlPosition::default(),
            on_style_change: None,
        }
    }

    pub fn position(mut self, position: ControlPosition) -> Self {
        self.position = position;
        self
    }

    pub fn on_style_change(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.on_style_change = Some(Rc::new(callback));
        self
    }
}

impl fmt::Debug for StyleSwitcherProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSwitcherProps")
            .field("options", &self.options)
            .field("position", &self.position)
            .field("on_style_change", &self.on_style_change.is_some())
            .finish()
    }
}

#[derive(Clone, Default)]
struct CallbackCells {
    before: CallbackCell<StyleChangeFn>,
    after: CallbackCell<StyleChangeFn>,
    style_change: CallbackCell<StyleUrlFn>,
}

impl CallbackCells {
    fn store(&self, props: &StyleSwitcherProps) {
        self.before.set(props.options.on_before_style_change.clone());
        self.after.set(props.options.on_after_style_change.clone());
        self.style_change.set(props.on_style_change.clone());
    }

    fn before_trampoline(&self) -> StyleChangeCallback {
        let before = self.before.clone();
        Rc::new(move |from: &StyleDescriptor, to: &StyleDescriptor| {
            if let Some(callback) = before.get() {
                callback(from, to);
            }
        })
    }

    // Runs the after-callback, then reports the new style URL.
    fn after_trampoline(&self) -> StyleChangeCallback {
        let after = self.after.clone();
        let style_change = self.style_change.clone();
        Rc::new(move |from: &StyleDescriptor, to: &StyleDescriptor| {
            if let Some(callback) = after.get() {
                callback(from, to);
            }
            if let Some(callback) = style_change.get() {
                callback(to.style_url.as_str());
            }
        })
    }
}

pub struct StyleSwitcherComponent {
    map: Rc<dyn MapEngine>,
    control: Rc<StyleSwitcherControl>,
    registered: SharedControl,
    position: ControlPosition,
    last_options: SwitcherOptions,
    callbacks: CallbackCells,
    mounted: bool,
}

impl StyleSwitcherComponent {
    pub fn mount(map: Rc<dyn MapEngine>, props: StyleSwitcherProps) -> Result<Self, SwitcherError> {
        let callbacks = CallbackCells::default();
        callbacks.store(&props);

        let mut options = props.options.clone();
        options.on_before_style_change = Some(callbacks.before_trampoline());
        options.on_after_style_change = Some(callbacks.after_trampoline());
        let control = Rc::new(StyleSwitcherControl::new(options)?);
        let registered: SharedControl = control.clone();
        map.add_control(Rc::clone(&registered), props.position)?;
        log::debug!("StyleSwitcherComponent: mounted at {}", props.position);

        Ok(StyleSwitcherComponent {
            map,
            control,
            registered,
            position: props.position,
            last_options: props.options,
            callbacks,
            mounted: true,
        })
    }

    /*
     * Applies new props. The option fields that differ from the previous
     * props are sent as one update, then the callbacks are swapped in place.
     * An invalid update is refused and the previous props, callbacks
     * included, stay in effect.
     *
     * An `active_style_id` that goes from set to unset is not forwarded: the
     * control keeps its current selection, as it does after a user-driven
     * change.
     */
    pub fn set_props(&mut self, props: StyleSwitcherProps) -> Result<(), SwitcherError> {
        if !self.mounted {
            return Err(SwitcherError::Platform(PlatformError::ControlNotRegistered));
        }
        let update = diff_options(&self.last_options, &props.options);
        if !update.is_empty() {
            self.control.update_options(update)?;
        }
        self.callbacks.store(&props);
        self.last_options = props.options;

        if props.position != self.position {
            self.move_to(props.position)?;
        }
        Ok(())
    }

    fn move_to(&mut self, position: ControlPosition) -> Result<(), SwitcherError> {
        if let Err(e) = self.map.remove_control(&self.registered) {
            log::warn!("StyleSwitcherComponent: control was not registered: {e}");
        }
        self.map.add_control(Rc::clone(&self.registered), position)?;
        log::debug!(
            "StyleSwitcherComponent: moved from {} to {position}",
            self.position
        );
        self.position = position;
        Ok(())
    }

    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        match self.map.remove_control(&self.registered) {
            Ok(()) => log::debug!("StyleSwitcherComponent: unmounted"),
            Err(e) => log::warn!("StyleSwitcherComponent: control already gone: {e}"),
        }
    }

    pub fn control(&self) -> Rc<StyleSwitcherControl> {
        Rc::clone(&self.control)
    }

    pub fn position(&self) -> ControlPosition {
        self.position
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl Drop for StyleSwitcherComponent {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for StyleSwitcherComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSwitcherComponent")
            .field("position", &self.position)
            .field("mounted", &self.mounted)
            .field("control", &self.control)
            .finish_non_exhaustive()
    }
}

// Fields of `next` that differ from `previous`, callbacks excluded.
fn diff_options(previous: &SwitcherOptions, next: &SwitcherOptions) -> OptionsUpdate {
    let mut update = OptionsUpdate::new();
    if next.styles != previous.styles {
        update.styles = Some(next.styles.clone());
    }
    if next.active_style_id != previous.active_style_id {
        update.active_style_id = next.active_style_id.clone();
    }
    if next.theme != previous.theme {
        update.theme = Some(next.theme);
    }
    if next.show_labels != previous.show_labels {
        update.show_labels = Some(next.show_labels);
    }
    if next.show_images != previous.show_images {
        update.show_images = Some(next.show_images);
    }
    if next.animation_duration != previous.animation_duration {
        update.animation_duration = Some(next.animation_duration);
    }
    if next.max_height != previous.max_height {
        update.max_height = Some(next.max_height);
    }
    if next.rtl != previous.rtl {
        update.rtl = Some(next.rtl);
    }
    // Sent fully resolved so keys dropped from the props fall back to defaults.
    if next.class_names != previous.class_names {
        update.class_names = Some(ClassNames::merged(&next.class_names).into());
    }
    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassNamesOverride, OptionsError, ThemeMode};
    use crate::platform_layer::{DomEvent, EngineFlavor, HeadlessMap};
    use std::cell::RefCell;
    use std::rc::Weak;

    fn options() -> SwitcherOptions {
        SwitcherOptions::new(vec![
            StyleDescriptor::new("a", "A", "a.png", "https://tiles.example/a.json"),
            StyleDescriptor::new("b", "B", "b.png", "https://tiles.example/b.json"),
        ])
    }

    fn engine() -> (Rc<HeadlessMap>, Rc<dyn MapEngine>) {
        crate::initialize_logging();
        let map = Rc::new(HeadlessMap::new(EngineFlavor::MapLibre));
        let engine: Rc<dyn MapEngine> = map.clone();
        (map, engine)
    }

    fn select(map: &HeadlessMap, control: &StyleSwitcherControl, style_id: &str) {
        map.dispatch_event(control.root().unwrap(), DomEvent::PointerEnter);
        map.dispatch_event(control.entry_node(style_id).unwrap(), DomEvent::Click);
    }

    #[test]
    fn test_mount_registers_at_bottom_left_by_default() {
        let (map, engine) = engine();
        let component = StyleSwitcherComponent::mount(engine, StyleSwitcherProps::new(options()))
            .unwrap();
        let root = component.control().root().unwrap();
        assert_eq!(map.controls_at(ControlPosition::BottomLeft), vec![root]);
        assert_eq!(component.position(), ControlPosition::BottomLeft);
    }

    #[test]
    fn test_on_style_change_receives_style_url() {
        let (map, engine) = engine();
        let weak_map: Weak<HeadlessMap> = Rc::downgrade(&map);
        let props = StyleSwitcherProps::new(options()).on_style_change(move |url| {
            if let Some(map) = weak_map.upgrade() {
                map.set_style(url);
            }
        });
        let component = StyleSwitcherComponent::mount(engine, props).unwrap();
        select(&map, &component.control(), "b");
        assert_eq!(map.style_url().as_deref(), Some("https://tiles.example/b.json"));
    }

    #[test]
    fn test_callback_change_does_not_rebuild_or_rerender() {
        let (map, engine) = engine();
        let calls: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        let first_calls = Rc::clone(&calls);
        let props = StyleSwitcherProps::new(
            options().on_after_style_change(move |_, _| first_calls.borrow_mut().push("first")),
        );
        let mut component = StyleSwitcherComponent::mount(engine, props).unwrap();
        let control = component.control();
        let renders = control.render_count();

        let second_calls = Rc::clone(&calls);
        component
            .set_props(StyleSwitcherProps::new(
                options().on_after_style_change(move |_, _| second_calls.borrow_mut().push("second")),
            ))
            .unwrap();
        assert!(Rc::ptr_eq(&control, &component.control()));
        assert_eq!(control.render_count(), renders);

        select(&map, &control, "b");
        assert_eq!(*calls.borrow(), vec!["second"]);
    }

    #[test]
    fn test_removed_callback_is_not_called() {
        let (map, engine) = engine();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let props = StyleSwitcherProps::new(
            options().on_before_style_change(move |_, _| *counter.borrow_mut() += 1),
        );
        let mut component = StyleSwitcherComponent::mount(engine, props).unwrap();
        component.set_props(StyleSwitcherProps::new(options())).unwrap();
        select(&map, &component.control(), "b");
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_prop_changes_update_the_same_control() {
        let (map, engine) = engine();
        let mut component =
            StyleSwitcherComponent::mount(engine, StyleSwitcherProps::new(options())).unwrap();
        let control = component.control();

        component
            .set_props(StyleSwitcherProps::new(
                options()
                    .rtl(true)
                    .theme(ThemeMode::Dark)
                    .class_names(ClassNamesOverride::item("x")),
            ))
            .unwrap();
        assert!(Rc::ptr_eq(&control, &component.control()));
        let root = control.root().unwrap();
        let doc = map.document();
        let doc = doc.borrow();
        assert_eq!(doc.attribute(root, "dir"), Some("rtl"));
        assert!(doc.has_class(root, "style-switcher-dark"));
        assert!(doc.has_class(control.current_entry_node().unwrap(), "x"));
    }

    #[test]
    fn test_active_style_prop_is_applied_without_callbacks() {
        let (_map, engine) = engine();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let base = options().on_after_style_change(move |_, _| *counter.borrow_mut() += 1);
        let mut component =
            StyleSwitcherComponent::mount(engine, StyleSwitcherProps::new(base.clone())).unwrap();
        component
            .set_props(StyleSwitcherProps::new(base.active_style_id("b")))
            .unwrap();
        assert_eq!(component.control().active_style_id().as_deref(), Some("b"));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_position_change_moves_same_control() {
        let (map, engine) = engine();
        let mut component =
            StyleSwitcherComponent::mount(engine, StyleSwitcherProps::new(options())).unwrap();
        let control = component.control();
        select(&map, &control, "b");

        component
            .set_props(StyleSwitcherProps::new(options()).position(ControlPosition::TopRight))
            .unwrap();
        assert!(map.controls_at(ControlPosition::BottomLeft).is_empty());
        assert_eq!(
            map.controls_at(ControlPosition::TopRight),
            vec![control.root().unwrap()]
        );
        assert_eq!(control.active_style_id().as_deref(), Some("b"));
        assert_eq!(map.control_count(), 1);
    }

    #[test]
    fn test_invalid_props_are_refused() {
        let (_map, engine) = engine();
        let mut component = StyleSwitcherComponent::mount(
            engine,
            StyleSwitcherProps::new(options().show_labels(false)),
        )
        .unwrap();
        let err = component
            .set_props(StyleSwitcherProps::new(
                options().show_labels(false).show_images(false),
            ))
            .unwrap_err();
        assert_eq!(err, SwitcherError::Options(OptionsError::NothingToDisplay));
        assert!(component.control().options().show_images);
    }

    #[test]
    fn test_refused_props_keep_previous_callbacks() {
        let (map, engine) = engine();
        let calls: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        let old_calls = Rc::clone(&calls);
        let mut component = StyleSwitcherComponent::mount(
            engine,
            StyleSwitcherProps::new(
                options().on_after_style_change(move |_, _| old_calls.borrow_mut().push("old")),
            ),
        )
        .unwrap();

        let new_calls = Rc::clone(&calls);
        let refused = component.set_props(StyleSwitcherProps::new(
            options()
                .show_labels(false)
                .show_images(false)
                .on_after_style_change(move |_, _| new_calls.borrow_mut().push("new")),
        ));
        assert!(refused.is_err());

        select(&map, &component.control(), "b");
        assert_eq!(*calls.borrow(), vec!["old"]);
    }

    #[test]
    fn test_dropped_class_name_prop_restores_default() {
        let (map, engine) = engine();
        let mut component = StyleSwitcherComponent::mount(
            engine,
            StyleSwitcherProps::new(options().class_names(ClassNamesOverride::item("x"))),
        )
        .unwrap();
        let control = component.control();
        {
            let doc = map.document();
            let doc = doc.borrow();
            assert!(doc.has_class(control.current_entry_node().unwrap(), "x"));
        }

        component.set_props(StyleSwitcherProps::new(options())).unwrap();
        let current = control.current_entry_node().unwrap();
        let doc = map.document();
        let doc = doc.borrow();
        assert!(doc.has_class(current, "style-switcher-item"));
        assert!(!doc.has_class(current, "x"));
        assert_eq!(control.class_names().item, "style-switcher-item");
    }

    #[test]
    fn test_unset_active_style_prop_keeps_selection() {
        let (_map, engine) = engine();
        let mut component = StyleSwitcherComponent::mount(
            engine,
            StyleSwitcherProps::new(options().active_style_id("b")),
        )
        .unwrap();
        component.set_props(StyleSwitcherProps::new(options())).unwrap();
        assert_eq!(component.control().active_style_id().as_deref(), Some("b"));
    }

    #[test]
    fn test_unmount_and_drop_unregister() {
        let (map, engine) = engine();
        let mut component = StyleSwitcherComponent::mount(
            Rc::clone(&engine),
            StyleSwitcherProps::new(options()),
        )
        .unwrap();
        component.unmount();
        assert_eq!(map.control_count(), 0);
        assert!(!component.control().is_attached());
        assert_eq!(
            component.set_props(StyleSwitcherProps::new(options())),
            Err(SwitcherError::Platform(PlatformError::ControlNotRegistered))
        );

        let component =
            StyleSwitcherComponent::mount(engine, StyleSwitcherProps::new(options())).unwrap();
        assert_eq!(map.control_count(), 1);
        drop(component);
        assert_eq!(map.control_count(), 0);
    }

    #[test]
    fn test_diff_options_reports_changed_fields_only() {
        let update = diff_options(&options(), &options().max_height(10));
        assert_eq!(update.max_height, Some(10));
        assert!(update.styles.is_none());
        assert!(update.rtl.is_none());
        assert!(diff_options(&options(), &options()).is_empty());
    }
}
