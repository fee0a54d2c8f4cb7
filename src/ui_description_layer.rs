/*
 * This module describes, without touching any element tree, what the style
 * switcher shows for a given `ControlState` and set of options: the root's
 * classes and attributes, the expanded list (if any) and the always-present
 * "current selection" entry. The app logic applies a `SwitcherView` to the
 * document; keeping the description pure makes the rendering rules testable
 * on their own.
 */
use crate::app_logic::ControlState;
use crate::app_logic::ui_constants;
use crate::model::{ClassNames, ResolvedTheme, StyleDescriptor, SwitcherOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescription {
    pub src: String,
    pub alt: String,
}

// One rendered catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescription {
    pub style_id: String,
    pub class_name: String,
    pub selected: bool,
    pub title: String,
    pub image: Option<ImageDescription>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDescription {
    pub class_name: String,
    pub style: String,
    pub entries: Vec<EntryDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitcherView {
    pub container_class: String,
    pub theme_class: String,
    pub stale_theme_class: String,
    pub expanded: bool,
    pub rtl: bool,
    pub root_style: String,
    pub list: Option<ListDescription>,
    pub current: Option<EntryDescription>,
}

/*
 * Builds the entry for `style`. The selected and label-hidden modifiers are
 * appended to the item class; the image and the label are each skipped when
 * hidden by the options.
 */
pub fn describe_entry(
    style: &StyleDescriptor,
    selected: bool,
    options: &SwitcherOptions,
    class_names: &ClassNames,
) -> EntryDescription {
    let mut class_name = class_names.item.clone();
    if selected {
        class_name.push(' ');
        class_name.push_str(&class_names.item_selected);
    }
    if !options.show_labels {
        class_name.push(' ');
        class_name.push_str(&class_names.item_hide_label);
    }
    EntryDescription {
        style_id: style.id.clone(),
        class_name,
        selected,
        title: style.accessible_name().to_string(),
        image: options.show_images.then(|| ImageDescription {
            src: style.image.clone(),
            alt: style.name.clone(),
        }),
        label: options.show_labels.then(|| style.name.clone()),
    }
}

pub fn describe_switcher(
    state: &ControlState,
    options: &SwitcherOptions,
    class_names: &ClassNames,
) -> SwitcherView {
    let (theme_class, stale_theme_class) = match state.resolved_theme {
        ResolvedTheme::Dark => (&class_names.dark, &class_names.light),
        ResolvedTheme::Light => (&class_names.light, &class_names.dark),
    };

    let current_style = state
        .active_style_id
        .as_deref()
        .and_then(|id| options.styles.find(id))
        .or_else(|| options.styles.first());

    let (list, current) = match current_style {
        None => (None, None),
        Some(current_style) => {
            let list = state.expanded.then(|| ListDescription {
                class_name: class_names.list.clone(),
                style: format!("display: flex; max-height: {}px", options.max_height),
                entries: options
                    .styles
                    .iter()
                    .map(|style| {
                        let selected = state.active_style_id.as_deref() == Some(style.id.as_str());
                        describe_entry(style, selected, options, class_names)
                    })
                    .collect(),
            });
            let current = describe_entry(current_style, true, options, class_names);
            (list, Some(current))
        }
    };

    SwitcherView {
        container_class: class_names.container.clone(),
        theme_class: theme_class.clone(),
        stale_theme_class: stale_theme_class.clone(),
        expanded: state.expanded,
        rtl: options.rtl,
        root_style: format!(
            "{}: {}ms; {}: {}px",
            ui_constants::ANIMATION_DURATION_PROPERTY,
            options.animation_duration,
            ui_constants::MAX_HEIGHT_PROPERTY,
            options.max_height
        ),
        list,
        current,
    }
}
