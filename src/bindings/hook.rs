/*
 * The hook-style binding. The host calls `sync` on every render with the map
 * (or `None` while it is not loaded), the options and the position. The
 * control is rebuilt from scratch whenever one of them changes; options are
 * compared by their JSON fingerprint, which leaves the callbacks out. A
 * callback change alone therefore keeps the control and its callbacks.
 */
use crate::app_logic::{StyleSwitcherControl, SwitcherError};
use crate::model::{ClassNamesOverride, StyleCatalog, SwitcherOptions, ThemeMode};
use crate::platform_layer::{ControlPosition, MapEngine, SharedControl};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

// The serialisable part of `SwitcherOptions`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OptionsFingerprint<'a> {
    styles: &'a StyleCatalog,
    active_style_id: &'a Option<String>,
    theme: ThemeMode,
    show_labels: bool,
    show_images: bool,
    animation_duration: u32,
    max_height: u32,
    rtl: bool,
    class_names: &'a ClassNamesOverride,
}

/*
 * `None` when serialisation fails, which never compares equal and so forces a
 * rebuild.
 */
pub fn options_fingerprint(options: &SwitcherOptions) -> Option<String> {
    let fingerprint = OptionsFingerprint {
        styles: &options.styles,
        active_style_id: &options.active_style_id,
        theme: options.theme,
        show_labels: options.show_labels,
        show_images: options.show_images,
        animation_duration: options.animation_duration,
        max_height: options.max_height,
        rtl: options.rtl,
        class_names: &options.class_names,
    };
    match serde_json::to_string(&fingerprint) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("StyleSwitcherHook: could not fingerprint options: {e}");
            None
        }
    }
}

struct HookMount {
    map: Rc<dyn MapEngine>,
    position: ControlPosition,
    fingerprint: Option<String>,
    control: Rc<StyleSwitcherControl>,
    registered: SharedControl,
}

impl HookMount {
    fn matches(
        &self,
        map: &Rc<dyn MapEngine>,
        position: ControlPosition,
        fingerprint: &Option<String>,
    ) -> bool {
        Rc::ptr_eq(&self.map, map)
            && self.position == position
            && self.fingerprint.is_some()
            && self.fingerprint == *fingerprint
    }
}

#[derive(Default)]
pub struct StyleSwitcherHook {
    mount: Option<HookMount>,
}

impl StyleSwitcherHook {
    pub fn new() -> Self {
        Self::default()
    }

    /*
     * Brings the registered control in line with the arguments and returns
     * it. The old control is removed before its replacement is built, so
     * invalid options leave nothing registered and return the construction
     * error.
     */
    pub fn sync(
        &mut self,
        map: Option<Rc<dyn MapEngine>>,
        options: &SwitcherOptions,
        position: ControlPosition,
    ) -> Result<Option<Rc<StyleSwitcherControl>>, SwitcherError> {
        let Some(map) = map else {
            self.unmount();
            return Ok(None);
        };

        let fingerprint = options_fingerprint(options);
        if let Some(mount) = &self.mount {
            if mount.matches(&map, position, &fingerprint) {
                return Ok(Some(Rc::clone(&mount.control)));
            }
        }

        self.unmount();
        let control = Rc::new(StyleSwitcherControl::new(options.clone())?);
        let registered: SharedControl = control.clone();
        map.add_control(Rc::clone(&registered), position)?;
        log::debug!("StyleSwitcherHook: control registered at {position}");
        self.mount = Some(HookMount {
            map,
            position,
            fingerprint,
            control: Rc::clone(&control),
            registered,
        });
        Ok(Some(control))
    }

    // Unregisters the current control, if any.
    pub fn unmount(&mut self) {
        let Some(mount) = self.mount.take() else {
            return;
        };
        match mount.map.remove_control(&mount.registered) {
            Ok(()) => log::debug!("StyleSwitcherHook: control removed from {}", mount.position),
            Err(e) => log::warn!("StyleSwitcherHook: control already gone: {e}"),
        }
    }

    pub fn control(&self) -> Option<Rc<StyleSwitcherControl>> {
        self.mount.as_ref().map(|mount| Rc::clone(&mount.control))
    }

    pub fn position(&self) -> Option<ControlPosition> {
        self.mount.as_ref().map(|mount| mount.position)
    }
}

impl Drop for StyleSwitcherHook {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for StyleSwitcherHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSwitcherHook")
            .field("position", &self.position())
            .field("control", &self.control())
            .finish()
    }
}
