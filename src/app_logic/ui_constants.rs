/*
 * Shared constants for the elements rendered by the style switcher: tags,
 * ARIA roles and labels, and the CSS custom properties carrying the
 * animation duration and maximum height to the companion stylesheet.
 */

pub const ROOT_TAG: &str = "div";
pub const LIST_TAG: &str = "div";
pub const ENTRY_TAG: &str = "div";
pub const IMAGE_TAG: &str = "img";
pub const LABEL_TAG: &str = "span";

// Accessible label of the root element.
pub const ROOT_ARIA_LABEL: &str = "Style switcher";
pub const ROOT_ROLE: &str = "button";
pub const LIST_ROLE: &str = "listbox";
pub const ENTRY_ROLE: &str = "option";

// Attribute carrying the style id of a rendered entry.
pub const STYLE_ID_ATTRIBUTE: &str = "data-style-id";

pub const ANIMATION_DURATION_PROPERTY: &str = "--style-switcher-animation-duration";
pub const MAX_HEIGHT_PROPERTY: &str = "--style-switcher-max-height";
