/*
 * This module defines the small vocabulary shared between the control and the
 * map engine that hosts it: where a control is anchored (`ControlPosition`),
 * which engine family renders the map (`EngineFlavor`), and the DOM events the
 * engine forwards to a control (`DomEvent`).
 */
use serde::{Deserialize, Serialize};
use std::fmt;

// The corner of the map a control is anchored to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    #[default]
    BottomLeft,
    BottomRight,
}

impl ControlPosition {
    pub const ALL: [ControlPosition; 4] = [
        ControlPosition::TopLeft,
        ControlPosition::TopRight,
        ControlPosition::BottomLeft,
        ControlPosition::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ControlPosition::TopLeft => "top-left",
            ControlPosition::TopRight => "top-right",
            ControlPosition::BottomLeft => "bottom-left",
            ControlPosition::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for ControlPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/*
 * The map engine family. Both engines use the same control-registration
 * protocol; they differ only in the CSS prefix of their control slots.
 */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EngineFlavor {
    #[default]
    MapLibre,
    Mapbox,
}

impl EngineFlavor {
    pub fn css_prefix(self) -> &'static str {
        match self {
            EngineFlavor::MapLibre => "maplibregl",
            EngineFlavor::Mapbox => "mapboxgl",
        }
    }

    // Class of the container holding the controls anchored at `position`.
    pub fn slot_class(self, position: ControlPosition) -> String {
        format!("{}-ctrl-{}", self.css_prefix(), position.as_str())
    }
}

/*
 * Platform-agnostic DOM events delivered to a control together with the node
 * they target. PointerEnter/PointerLeave/Focus/Blur do not bubble; Click and
 * KeyDown do.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    PointerEnter,
    PointerLeave,
    Focus,
    Blur,
    Click,
    KeyDown(String),
}

impl DomEvent {
    // True for events that activate an entry (mouse click, Enter or Space).
    pub fn is_activation(&self) -> bool {
        match self {
            DomEvent::Click => true,
            DomEvent::KeyDown(key) => key == "Enter" || key == " ",
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_names_and_default() {
        assert_eq!(ControlPosition::default(), ControlPosition::BottomLeft);
        assert_eq!(ControlPosition::TopRight.to_string(), "top-right");
        let parsed: ControlPosition = serde_json::from_str("\"bottom-right\"").unwrap();
        assert_eq!(parsed, ControlPosition::BottomRight);
    }

    #[test]
    fn test_slot_class_per_flavor() {
        assert_eq!(
            EngineFlavor::MapLibre.slot_class(ControlPosition::BottomLeft),
            "maplibregl-ctrl-bottom-left"
        );
        assert_eq!(
            EngineFlavor::Mapbox.slot_class(ControlPosition::TopRight),
            "mapboxgl-ctrl-top-right"
        );
    }

    #[test]
    fn test_activation_events() {
        assert!(DomEvent::Click.is_activation());
        assert!(DomEvent::KeyDown("Enter".to_string()).is_activation());
        assert!(DomEvent::KeyDown(" ".to_string()).is_activation());
        assert!(!DomEvent::KeyDown("Escape".to_string()).is_activation());
        assert!(!DomEvent::PointerEnter.is_activation());
    }
}
