/*
 * The configuration surface of the style switcher. `SwitcherOptions` is the
 * full option set handed to the control at construction, `OptionsUpdate` is
 * the partial form accepted afterwards (only supplied fields change), and
 * `ClassNames` / `ClassNamesOverride` are the CSS class hooks consumed by the
 * companion stylesheet.
 */
use super::style_catalog::{StyleCatalog, StyleDescriptor};
use super::theme::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

pub const DEFAULT_ANIMATION_DURATION_MS: u32 = 200;
pub const DEFAULT_MAX_HEIGHT_PX: u32 = 300;

/*
 * Host notification invoked with `(from, to)` around a user-driven style
 * change. Callbacks are shared so the bindings can hand the same callback to a
 * rebuilt control, and so the control can call them without holding a borrow
 * of its own state.
 */
pub type StyleChangeCallback = Rc<dyn Fn(&StyleDescriptor, &StyleDescriptor)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    // Both labels and images are hidden; the control would render nothing usable.
    NothingToDisplay,
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::NothingToDisplay => {
                write!(f, "At least one of showLabels or showImages must be true.")
            }
        }
    }
}

impl std::error::Error for OptionsError {}

// The complete set of CSS class hooks used when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassNames {
    pub container: String,
    pub list: String,
    pub item: String,
    pub item_selected: String,
    pub item_hide_label: String,
    pub dark: String,
    pub light: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        ClassNames {
            container: "maplibregl-ctrl maplibregl-ctrl-group mapboxgl-ctrl mapboxgl-ctrl-group style-switcher".to_string(),
            list: "style-switcher-list".to_string(),
            item: "style-switcher-item".to_string(),
            item_selected: "selected".to_string(),
            item_hide_label: "hide-label".to_string(),
            dark: "style-switcher-dark".to_string(),
            light: "style-switcher-light".to_string(),
        }
    }
}

impl ClassNames {
    // Shallow merge: every field present in `overrides` replaces ours.
    pub fn merge(&mut self, overrides: &ClassNamesOverride) {
        let pairs = [
            (&mut self.container, &overrides.container),
            (&mut self.list, &overrides.list),
            (&mut self.item, &overrides.item),
            (&mut self.item_selected, &overrides.item_selected),
            (&mut self.item_hide_label, &overrides.item_hide_label),
            (&mut self.dark, &overrides.dark),
            (&mut self.light, &overrides.light),
        ];
        for (slot, replacement) in pairs {
            if let Some(value) = replacement {
                slot.clone_from(value);
            }
        }
    }

    pub fn merged(overrides: &ClassNamesOverride) -> Self {
        let mut class_names = ClassNames::default();
        class_names.merge(overrides);
        class_names
    }
}

// A partial class-name map; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassNamesOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_selected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_hide_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<String>,
}

impl ClassNamesOverride {
    pub fn item(item: impl Into<String>) -> Self {
        ClassNamesOverride {
            item: Some(item.into()),
            ..Default::default()
        }
    }
}

// Every field present, so merging it replaces the whole class-name set.
impl From<ClassNames> for ClassNamesOverride {
    fn from(class_names: ClassNames) -> Self {
        ClassNamesOverride {
            container: Some(class_names.container),
            list: Some(class_names.list),
            item: Some(class_names.item),
            item_selected: Some(class_names.item_selected),
            item_hide_label: Some(class_names.item_hide_label),
            dark: Some(class_names.dark),
            light: Some(class_names.light),
        }
    }
}

/*
 * Everything a `StyleSwitcherControl` needs at construction. Defaults:
 * labels and images shown, light theme, 200 ms animation, 300 px maximum
 * list height, left-to-right layout.
 */
#[derive(Clone)]
pub struct SwitcherOptions {
    pub styles: StyleCatalog,
    pub active_style_id: Option<String>,
    pub theme: ThemeMode,
    pub show_labels: bool,
    pub show_images: bool,
    pub animation_duration: u32,
    pub max_height: u32,
    pub rtl: bool,
    pub class_names: ClassNamesOverride,
    pub on_before_style_change: Option<StyleChangeCallback>,
    pub on_after_style_change: Option<StyleChangeCallback>,
}

impl SwitcherOptions {
    pub fn new(styles: impl Into<StyleCatalog>) -> Self {
        SwitcherOptions {
            styles: styles.into(),
            active_style_id: None,
            theme: ThemeMode::default(),
            show_labels: true,
            show_images: true,
            animation_duration: DEFAULT_ANIMATION_DURATION_MS,
            max_height: DEFAULT_MAX_HEIGHT_PX,
            rtl: false,
            class_names: ClassNamesOverride::default(),
            on_before_style_change: None,
            on_after_style_change: None,
        }
    }

    pub fn active_style_id(mut self, id: impl Into<String>) -> Self {
        self.active_style_id = Some(id.into());
        self
    }

    pub fn theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }

    pub fn show_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    pub fn show_images(mut self, show: bool) -> Self {
        self.show_images = show;
        self
    }

    pub fn animation_duration(mut self, millis: u32) -> Self {
        self.animation_duration = millis;
        self
    }

    pub fn max_height(mut self, pixels: u32) -> Self {
        self.max_height = pixels;
        self
    }

    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn class_names(mut self, overrides: ClassNamesOverride) -> Self {
        self.class_names = overrides;
        self
    }

    pub fn on_before_style_change(
        mut self,
        callback: impl Fn(&StyleDescriptor, &StyleDescriptor) + 'static,
    ) -> Self {
        self.on_before_style_change = Some(Rc::new(callback));
        self
    }

    pub fn on_after_style_change(
        mut self,
        callback: impl Fn(&StyleDescriptor, &StyleDescriptor) + 'static,
    ) -> Self {
        self.on_after_style_change = Some(Rc::new(callback));
        self
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.show_labels && !self.show_images {
            return Err(OptionsError::NothingToDisplay);
        }
        Ok(())
    }

    /*
     * Merges the supplied fields of `update` into these options. Class-name
     * overrides are shallow-merged rather than replaced. The caller is
     * responsible for validating the result.
     */
    pub fn apply(&mut self, update: &OptionsUpdate) {
        if let Some(styles) = &update.styles {
            self.styles = styles.clone();
        }
        if let Some(id) = &update.active_style_id {
            self.active_style_id = Some(id.clone());
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(show) = update.show_labels {
            self.show_labels = show;
        }
        if let Some(show) = update.show_images {
            self.show_images = show;
        }
        if let Some(millis) = update.animation_duration {
            self.animation_duration = millis;
        }
        if let Some(pixels) = update.max_height {
            self.max_height = pixels;
        }
        if let Some(rtl) = update.rtl {
            self.rtl = rtl;
        }
        if let Some(overrides) = &update.class_names {
            merge_override(&mut self.class_names, overrides);
        }
        if let Some(callback) = &update.on_before_style_change {
            self.on_before_style_change = Some(Rc::clone(callback));
        }
        if let Some(callback) = &update.on_after_style_change {
            self.on_after_style_change = Some(Rc::clone(callback));
        }
    }
}

fn merge_override(target: &mut ClassNamesOverride, overrides: &ClassNamesOverride) {
    let pairs = [
        (&mut target.container, &overrides.container),
        (&mut target.list, &overrides.list),
        (&mut target.item, &overrides.item),
        (&mut target.item_selected, &overrides.item_selected),
        (&mut target.item_hide_label, &overrides.item_hide_label),
        (&mut target.dark, &overrides.dark),
        (&mut target.light, &overrides.light),
    ];
    for (slot, replacement) in pairs {
        if replacement.is_some() {
            slot.clone_from(replacement);
        }
    }
}

impl fmt::Debug for SwitcherOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitcherOptions")
            .field("styles", &self.styles)
            .field("active_style_id", &self.active_style_id)
            .field("theme", &self.theme)
            .field("show_labels", &self.show_labels)
            .field("show_images", &self.show_images)
            .field("animation_duration", &self.animation_duration)
            .field("max_height", &self.max_height)
            .field("rtl", &self.rtl)
            .field("class_names", &self.class_names)
            .field(
                "on_before_style_change",
                &self.on_before_style_change.is_some(),
            )
            .field(
                "on_after_style_change",
                &self.on_after_style_change.is_some(),
            )
            .finish()
    }
}

// A partial options change. `None` means "leave as is".
#[derive(Clone, Default)]
pub struct OptionsUpdate {
    pub styles: Option<StyleCatalog>,
    pub active_style_id: Option<String>,
    pub theme: Option<ThemeMode>,
    pub show_labels: Option<bool>,
    pub show_images: Option<bool>,
    pub animation_duration: Option<u32>,
    pub max_height: Option<u32>,
    pub rtl: Option<bool>,
    pub class_names: Option<ClassNamesOverride>,
    pub on_before_style_change: Option<StyleChangeCallback>,
    pub on_after_style_change: Option<StyleChangeCallback>,
}

impl OptionsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styles(mut self, styles: impl Into<StyleCatalog>) -> Self {
        self.styles = Some(styles.into());
        self
    }

    pub fn active_style_id(mut self, id: impl Into<String>) -> Self {
        self.active_style_id = Some(id.into());
        self
    }

    pub fn theme(mut self, theme: ThemeMode) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn show_labels(mut self, show: bool) -> Self {
        self.show_labels = Some(show);
        self
    }

    pub fn show_images(mut self, show: bool) -> Self {
        self.show_images = Some(show);
        self
    }

    pub fn animation_duration(mut self, millis: u32) -> Self {
        self.animation_duration = Some(millis);
        self
    }

    pub fn max_height(mut self, pixels: u32) -> Self {
        self.max_height = Some(pixels);
        self
    }

    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = Some(rtl);
        self
    }

    pub fn class_names(mut self, overrides: ClassNamesOverride) -> Self {
        self.class_names = Some(overrides);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_none()
            && self.active_style_id.is_none()
            && self.theme.is_none()
            && self.show_labels.is_none()
            && self.show_images.is_none()
            && self.animation_duration.is_none()
            && self.max_height.is_none()
            && self.rtl.is_none()
            && self.class_names.is_none()
            && self.on_before_style_change.is_none()
            && self.on_after_style_change.is_none()
    }
}

impl fmt::Debug for OptionsUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsUpdate")
            .field("styles", &self.styles)
            .field("active_style_id", &self.active_style_id)
            .field("theme", &self.theme)
            .field("show_labels", &self.show_labels)
            .field("show_images", &self.show_images)
            .field("animation_duration", &self.animation_duration)
            .field("max_height", &self.max_height)
            .field("rtl", &self.rtl)
            .field("class_names", &self.class_names)
            .finish_non_exhaustive()
    }
}
