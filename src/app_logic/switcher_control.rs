/*
 * The style switcher control. It owns a `ControlState`, the element subtree
 * it renders into the map's document, and its subscription to the
 * color-scheme provider. Everything else (the catalog, the map engine, the
 * document itself) belongs to the host.
 *
 * All methods take `&self`. The shared core sits behind a `RefCell`, and no
 * borrow of it is held while a host callback runs, so a callback may inspect
 * the control or detach it. A callback that synchronously triggers another
 * selection is not supported.
 */
use super::control_state::{ControlState, Diagnostic, select_active_style};
use super::error::SwitcherError;
use super::ui_constants;
use crate::model::{
    ClassNames, OptionsError, OptionsUpdate, ResolvedTheme, StyleDescriptor, SwitcherOptions,
    resolve_theme,
};
use crate::platform_layer::{
    ColorSchemeProvider, Document, DomEvent, MapHandle, NodeId, PlatformError, PlatformResult,
    SharedDocument, SubscriptionId,
};
use crate::ui_description_layer::{EntryDescription, describe_switcher};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

// The state transitions a control understands, already translated from DOM events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    Expand,
    Collapse,
    Select(String),
}

// What exists only while the control is attached.
struct Mount {
    document: SharedDocument,
    root: NodeId,
    color_scheme: Rc<dyn ColorSchemeProvider>,
    subscription: Option<SubscriptionId>,
}

struct SwitcherCore {
    options: SwitcherOptions,
    class_names: ClassNames,
    state: ControlState,
    diagnostics: Vec<Diagnostic>,
    // Overrides the provider carried by the map handle.
    injected_color_scheme: Option<Rc<dyn ColorSchemeProvider>>,
    mount: Option<Mount>,
    list_node: Option<NodeId>,
    current_node: Option<NodeId>,
    // Rendered list entries and the style id each one selects.
    entry_nodes: Vec<(NodeId, String)>,
    render_count: usize,
}

pub struct StyleSwitcherControl {
    core: Rc<RefCell<SwitcherCore>>,
}

impl StyleSwitcherControl {
    /*
     * Validates `options` and derives the initial state. Fails when both
     * labels and images are hidden. An unknown active style id is not an
     * error: it is recorded as a diagnostic and the first style is used.
     */
    pub fn new(options: SwitcherOptions) -> Result<Self, SwitcherError> {
        options.validate()?;
        let (state, diagnostics) = ControlState::initial(&options, false);
        log::debug!(
            "StyleSwitcher: created with {} style(s), active={:?}",
            options.styles.len(),
            state.active_style_id
        );
        let class_names = ClassNames::merged(&options.class_names);
        Ok(StyleSwitcherControl {
            core: Rc::new(RefCell::new(SwitcherCore {
                options,
                class_names,
                state,
                diagnostics,
                injected_color_scheme: None,
                mount: None,
                list_node: None,
                current_node: None,
                entry_nodes: Vec::new(),
                render_count: 0,
            })),
        })
    }

    // Uses `provider` instead of the map's color-scheme provider.
    pub fn with_color_scheme(self, provider: Rc<dyn ColorSchemeProvider>) -> Self {
        {
            let mut core = self.core.borrow_mut();
            core.state.resolved_theme = resolve_theme(core.options.theme, provider.prefers_dark());
            core.injected_color_scheme = Some(provider);
        }
        self
    }

    // --- Lifecycle ---

    /*
     * Builds the root element in the map's document, subscribes to the
     * color-scheme provider when the theme follows the OS, and renders. The
     * returned root is not yet inserted anywhere; mounting it is the engine's
     * job. Attaching an attached control detaches it first.
     */
    pub fn attach(&self, map: &MapHandle) -> PlatformResult<NodeId> {
        if self.is_attached() {
            log::warn!("StyleSwitcher: attach called while attached, detaching first");
            self.detach();
        }

        let mut core = self.core.borrow_mut();
        let color_scheme = core
            .injected_color_scheme
            .clone()
            .unwrap_or_else(|| Rc::clone(&map.color_scheme));
        core.state.expanded = false;
        core.state.resolved_theme = resolve_theme(core.options.theme, color_scheme.prefers_dark());

        let root = {
            let mut doc = map.document.borrow_mut();
            let root = doc.create_element(ui_constants::ROOT_TAG);
            doc.set_attribute(root, "role", ui_constants::ROOT_ROLE)?;
            doc.set_attribute(root, "tabindex", "0")?;
            doc.set_attribute(root, "aria-label", ui_constants::ROOT_ARIA_LABEL)?;
            root
        };

        let subscription = core
            .options
            .theme
            .follows_os()
            .then(|| subscribe_to_color_scheme(&self.core, color_scheme.as_ref()));
        core.mount = Some(Mount {
            document: Rc::clone(&map.document),
            root,
            color_scheme,
            subscription,
        });

        if let Err(e) = core.render() {
            log::error!("StyleSwitcher: initial render failed: {e}");
            drop(core);
            self.detach();
            return Err(e);
        }
        log::debug!(
            "StyleSwitcher: attached at {root:?} ({:?} flavor, theme {})",
            map.flavor,
            core.state.resolved_theme
        );
        Ok(root)
    }

    /*
     * Unsubscribes from the color-scheme provider and releases the rendered
     * subtree. Safe before attach, after detach and from inside a callback.
     */
    pub fn detach(&self) {
        let mount = {
            let Ok(mut core) = self.core.try_borrow_mut() else {
                log::error!("StyleSwitcher: detach while the control is busy, ignored");
                return;
            };
            core.list_node = None;
            core.current_node = None;
            core.entry_nodes.clear();
            core.mount.take()
        };
        let Some(mount) = mount else {
            log::trace!("StyleSwitcher: detach on a detached control");
            return;
        };

        if let Some(id) = mount.subscription {
            mount.color_scheme.unsubscribe(id);
        }
        match mount.document.try_borrow_mut() {
            Ok(mut doc) => {
                if let Err(e) = doc.remove_subtree(mount.root) {
                    log::trace!("StyleSwitcher: root already released: {e}");
                }
            }
            Err(_) => log::error!("StyleSwitcher: document busy, root {:?} left behind", mount.root),
        }
        log::debug!("StyleSwitcher: detached from {:?}", mount.root);
    }

    // --- Events ---

    /*
     * Maps a DOM event to a control event. Pointer and focus events count
     * only on the root; activation counts on a list entry or anything inside
     * it. Nothing is recognised while detached.
     */
    pub fn event_for_target(&self, target: NodeId, event: &DomEvent) -> Option<ControlEvent> {
        let core = self.core.try_borrow().ok()?;
        let mount = core.mount.as_ref()?;
        match event {
            DomEvent::PointerEnter | DomEvent::Focus if target == mount.root => {
                Some(ControlEvent::Expand)
            }
            DomEvent::PointerLeave | DomEvent::Blur if target == mount.root => {
                Some(ControlEvent::Collapse)
            }
            event if event.is_activation() => {
                let doc = mount.document.try_borrow().ok()?;
                let selected = core
                    .entry_nodes
                    .iter()
                    .find(|(node, _)| doc.is_ancestor_or_self(*node, target))
                    .map(|(_, style_id)| ControlEvent::Select(style_id.clone()));
                selected
            }
            _ => None,
        }
    }

    // Applies `event`. Returns whether the state changed.
    pub fn handle_event(&self, event: ControlEvent) -> bool {
        match event {
            ControlEvent::Expand => self.set_expanded(true),
            ControlEvent::Collapse => self.set_expanded(false),
            ControlEvent::Select(style_id) => self.select(&style_id),
        }
    }

    fn set_expanded(&self, expanded: bool) -> bool {
        let Ok(mut core) = self.core.try_borrow_mut() else {
            log::warn!("StyleSwitcher: re-entrant expand/collapse ignored");
            return false;
        };
        if core.mount.is_none() {
            log::trace!("StyleSwitcher: expand/collapse on a detached control ignored");
            return false;
        }
        if core.state.expanded == expanded {
            return false;
        }
        core.state.expanded = expanded;
        log::debug!("StyleSwitcher: expanded={expanded}");
        core.render_or_log();
        true
    }

    /*
     * The selection transition: before-callback, commit, render,
     * after-callback. Selecting the active style does nothing at all.
     */
    fn select(&self, style_id: &str) -> bool {
        let (from, to, on_before) = {
            let Ok(core) = self.core.try_borrow() else {
                log::warn!("StyleSwitcher: re-entrant selection of '{style_id}' ignored");
                return false;
            };
            if core.mount.is_none() {
                log::trace!("StyleSwitcher: selection on a detached control ignored");
                return false;
            }
            if core.state.active_style_id.as_deref() == Some(style_id) {
                log::trace!("StyleSwitcher: '{style_id}' is already active");
                return false;
            }
            let Some(to) = core.options.styles.find(style_id).cloned() else {
                log::warn!("StyleSwitcher: cannot select unknown style '{style_id}'");
                return false;
            };
            let Some(from) = core.current_style().cloned() else {
                return false;
            };
            (from, to, core.options.on_before_style_change.clone())
        };

        if let Some(callback) = on_before {
            callback(&from, &to);
        }

        let on_after = {
            let Ok(mut core) = self.core.try_borrow_mut() else {
                log::warn!("StyleSwitcher: control busy, selection of '{style_id}' dropped");
                return false;
            };
            core.state.active_style_id = Some(to.id.clone());
            log::debug!("StyleSwitcher: style changed '{}' -> '{}'", from.id, to.id);
            core.render_or_log();
            core.options.on_after_style_change.clone()
        };

        if let Some(callback) = on_after {
            callback(&from, &to);
        }
        true
    }

    // --- Options ---

    /*
     * Merges the supplied fields into the live options. A supplied active
     * style id is applied directly without callbacks. The update is refused,
     * and nothing changes, if it would hide both labels and images.
     */
    pub fn update_options(&self, update: OptionsUpdate) -> Result<(), OptionsError> {
        let mut core = self.core.borrow_mut();
        let mut next = core.options.clone();
        next.apply(&update);
        next.validate()?;

        let followed_os = core.options.theme.follows_os();
        core.options = next;
        core.class_names = ClassNames::merged(&core.options.class_names);

        if let Some(styles) = &update.styles {
            let issues: Vec<Diagnostic> = styles.issues().into_iter().map(Diagnostic::from).collect();
            for diagnostic in &issues {
                log::warn!("StyleSwitcher: {diagnostic}");
            }
            core.diagnostics.extend(issues);
        }
        let requested = match &update.active_style_id {
            Some(id) => Some(id.clone()),
            None if update.styles.is_some() => core.state.active_style_id.clone(),
            None => None,
        };
        if let Some(requested) = requested {
            let (active, unknown) = select_active_style(&core.options, Some(&requested));
            if let Some(diagnostic) = unknown {
                log::warn!("StyleSwitcher: {diagnostic}");
                core.diagnostics.push(diagnostic);
            }
            core.state.active_style_id = active;
        } else if core.state.active_style_id.is_none() {
            core.state.active_style_id = core.options.styles.first().map(|s| s.id.clone());
        }

        let follows_os = core.options.theme.follows_os();
        let prefers_dark = match (&core.mount, &core.injected_color_scheme) {
            (Some(mount), _) => mount.color_scheme.prefers_dark(),
            (None, Some(provider)) => provider.prefers_dark(),
            (None, None) => false,
        };
        core.state.resolved_theme = resolve_theme(core.options.theme, prefers_dark);

        if let Some(mount) = core.mount.as_mut() {
            if follows_os && !followed_os {
                mount.subscription =
                    Some(subscribe_to_color_scheme(&self.core, mount.color_scheme.as_ref()));
            } else if !follows_os {
                if let Some(id) = mount.subscription.take() {
                    mount.color_scheme.unsubscribe(id);
                }
            }
        }

        log::debug!("StyleSwitcher: options updated {update:?}");
        core.render_or_log();
        Ok(())
    }

    // --- Accessors ---

    pub fn active_style_id(&self) -> Option<String> {
        self.core.borrow().state.active_style_id.clone()
    }

    pub fn active_style(&self) -> Option<StyleDescriptor> {
        self.core.borrow().current_style().cloned()
    }

    pub fn is_expanded(&self) -> bool {
        self.core.borrow().state.expanded
    }

    pub fn resolved_theme(&self) -> ResolvedTheme {
        self.core.borrow().state.resolved_theme
    }

    pub fn state(&self) -> ControlState {
        self.core.borrow().state.clone()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.core.borrow().mount.as_ref().map(|mount| mount.root)
    }

    pub fn is_attached(&self) -> bool {
        self.core.borrow().mount.is_some()
    }

    pub fn options(&self) -> SwitcherOptions {
        self.core.borrow().options.clone()
    }

    pub fn class_names(&self) -> ClassNames {
        self.core.borrow().class_names.clone()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.core.borrow().diagnostics.clone()
    }

    // Number of renders performed since construction.
    pub fn render_count(&self) -> usize {
        self.core.borrow().render_count
    }

    pub fn list_node(&self) -> Option<NodeId> {
        self.core.borrow().list_node
    }

    pub fn current_entry_node(&self) -> Option<NodeId> {
        self.core.borrow().current_node
    }

    // The rendered list entry selecting `style_id`, while expanded.
    pub fn entry_node(&self, style_id: &str) -> Option<NodeId> {
        self.core
            .borrow()
            .entry_nodes
            .iter()
            .find(|(_, id)| id == style_id)
            .map(|(node, _)| *node)
    }
}

impl fmt::Debug for StyleSwitcherControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.core.try_borrow() {
            Ok(core) => f
                .debug_struct("StyleSwitcherControl")
                .field("state", &core.state)
                .field("root", &core.mount.as_ref().map(|mount| mount.root))
                .field("styles", &core.options.styles.len())
                .finish(),
            Err(_) => f.write_str("StyleSwitcherControl { <busy> }"),
        }
    }
}

/*
 * The listener only holds a weak reference, so a provider outliving the
 * control never keeps it alive. It re-resolves the theme and swaps the theme
 * class on the root; nothing else is re-rendered.
 */
fn subscribe_to_color_scheme(
    core: &Rc<RefCell<SwitcherCore>>,
    provider: &dyn ColorSchemeProvider,
) -> SubscriptionId {
    let weak: Weak<RefCell<SwitcherCore>> = Rc::downgrade(core);
    let id = provider.subscribe(Rc::new(move |prefers_dark| {
        let Some(core) = weak.upgrade() else {
            return;
        };
        let Ok(mut core) = core.try_borrow_mut() else {
            log::warn!("StyleSwitcher: color-scheme change while busy, ignored");
            return;
        };
        core.on_color_scheme_change(prefers_dark);
    }));
    log::trace!("StyleSwitcher: subscribed to color-scheme changes ({id:?})");
    id
}

impl SwitcherCore {
    // The active style, or the first catalog entry when the id is unknown.
    fn current_style(&self) -> Option<&StyleDescriptor> {
        self.state
            .active_style_id
            .as_deref()
            .and_then(|id| self.options.styles.find(id))
            .or_else(|| self.options.styles.first())
    }

    fn on_color_scheme_change(&mut self, prefers_dark: bool) {
        let Some(mount) = &self.mount else {
            return;
        };
        if !self.options.theme.follows_os() {
            return;
        }
        let theme = resolve_theme(self.options.theme, prefers_dark);
        if theme == self.state.resolved_theme {
            return;
        }
        self.state.resolved_theme = theme;
        let (current, stale) = match theme {
            ResolvedTheme::Dark => (&self.class_names.dark, &self.class_names.light),
            ResolvedTheme::Light => (&self.class_names.light, &self.class_names.dark),
        };
        let result = mount.document.try_borrow_mut().map(|mut doc| {
            doc.remove_class(mount.root, stale)
                .and_then(|_| doc.add_class(mount.root, current))
        });
        match result {
            Ok(Ok(())) => log::debug!("StyleSwitcher: theme now {theme}"),
            Ok(Err(e)) => log::error!("StyleSwitcher: failed to apply theme {theme}: {e}"),
            Err(_) => log::error!("StyleSwitcher: document busy, theme {theme} not applied"),
        }
    }

    fn render_or_log(&mut self) {
        if let Err(e) = self.render() {
            log::error!("StyleSwitcher: render failed: {e}");
        }
    }

    /*
     * Rebuilds the children of the root from the current state. A no-op
     * while detached.
     */
    fn render(&mut self) -> PlatformResult<()> {
        let Some(mount) = &self.mount else {
            return Ok(());
        };
        let view = describe_switcher(&self.state, &self.options, &self.class_names);
        let root = mount.root;
        let document = Rc::clone(&mount.document);
        let mut doc = document.try_borrow_mut().map_err(|_| {
            PlatformError::OperationFailed("document is borrowed by the host".to_string())
        })?;

        doc.clear_children(root)?;
        self.list_node = None;
        self.current_node = None;
        self.entry_nodes.clear();

        doc.set_class_name(root, &view.container_class)?;
        doc.remove_class(root, &view.stale_theme_class)?;
        doc.add_class(root, &view.theme_class)?;
        doc.set_attribute(root, "aria-expanded", bool_attr(view.expanded))?;
        doc.set_attribute(root, "style", &view.root_style)?;
        if view.rtl {
            doc.set_attribute(root, "dir", "rtl")?;
        } else {
            doc.remove_attribute(root, "dir")?;
        }

        if let Some(list) = &view.list {
            let list_node = doc.create_element(ui_constants::LIST_TAG);
            doc.set_class_name(list_node, &list.class_name)?;
            doc.set_attribute(list_node, "role", ui_constants::LIST_ROLE)?;
            doc.set_attribute(list_node, "style", &list.style)?;
            for entry in &list.entries {
                let node = build_entry(&mut doc, entry)?;
                doc.set_attribute(node, "tabindex", "0")?;
                doc.append_child(list_node, node)?;
                self.entry_nodes.push((node, entry.style_id.clone()));
            }
            doc.append_child(root, list_node)?;
            self.list_node = Some(list_node);
        }

        if let Some(current) = &view.current {
            let node = build_entry(&mut doc, current)?;
            doc.append_child(root, node)?;
            self.current_node = Some(node);
        }

        self.render_count += 1;
        log::trace!(
            "StyleSwitcher: render #{} ({} list entries)",
            self.render_count,
            self.entry_nodes.len()
        );
        Ok(())
    }
}

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn build_entry(
    doc: &mut Document,
    entry: &EntryDescription,
) -> PlatformResult<NodeId> {
    let node = doc.create_element(ui_constants::ENTRY_TAG);
    doc.set_class_name(node, &entry.class_name)?;
    doc.set_attribute(node, "role", ui_constants::ENTRY_ROLE)?;
    doc.set_attribute(node, "aria-selected", bool_attr(entry.selected))?;
    doc.set_attribute(node, "aria-label", &entry.title)?;
    doc.set_attribute(node, "title", &entry.title)?;
    doc.set_attribute(node, ui_constants::STYLE_ID_ATTRIBUTE, &entry.style_id)?;

    if let Some(image) = &entry.image {
        let img = doc.create_element(ui_constants::IMAGE_TAG);
        doc.set_attribute(img, "src", &image.src)?;
        doc.set_attribute(img, "alt", &image.alt)?;
        doc.set_attribute(img, "loading", "lazy")?;
        doc.append_child(node, img)?;
    }
    if let Some(label) = &entry.label {
        let span = doc.create_element(ui_constants::LABEL_TAG);
        doc.set_text(span, label)?;
        doc.append_child(node, span)?;
    }
    Ok(node)
}
