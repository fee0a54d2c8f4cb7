/*
 * Defines the style descriptors offered by a switcher and the ordered catalog
 * that holds them. Descriptors are owned by the host application; the control
 * only reads them and hands clones back through the style-change callbacks.
 *
 * The catalog does not enforce id uniqueness. Duplicate or empty ids are a
 * caller error, reported through `StyleCatalog::issues` so the control can
 * warn about them without refusing the catalog.
 */
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// A basemap style entry: a display name, a preview image and the URL of the
// vector-tile style definition the host should apply when it is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    pub id: String,
    pub name: String,
    pub image: String,
    pub style_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StyleDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image: impl Into<String>,
        style_url: impl Into<String>,
    ) -> Self {
        StyleDescriptor {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            style_url: style_url.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /*
     * The text used as the accessible name of a rendered entry: the
     * description when present, otherwise the display name.
     */
    pub fn accessible_name(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}

// A problem found while inspecting a catalog. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    EmptyId { index: usize },
    DuplicateId { id: String, index: usize },
}

// The ordered collection of style descriptors offered by one control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleCatalog {
    styles: Vec<StyleDescriptor>,
}

impl StyleCatalog {
    pub fn new(styles: Vec<StyleDescriptor>) -> Self {
        StyleCatalog { styles }
    }

    pub fn styles(&self) -> &[StyleDescriptor] {
        &self.styles
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn first(&self) -> Option<&StyleDescriptor> {
        self.styles.first()
    }

    pub fn find(&self, id: &str) -> Option<&StyleDescriptor> {
        self.styles.iter().find(|style| style.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StyleDescriptor> {
        self.styles.iter()
    }

    /*
     * Scans the catalog for empty and duplicate ids, in catalog order. The
     * first occurrence of an id is never reported, only later repeats.
     */
    pub fn issues(&self) -> Vec<CatalogIssue> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut issues = Vec::new();
        for (index, style) in self.styles.iter().enumerate() {
            if style.id.is_empty() {
                issues.push(CatalogIssue::EmptyId { index });
                continue;
            }
            if !seen.insert(style.id.as_str()) {
                issues.push(CatalogIssue::DuplicateId {
                    id: style.id.clone(),
                    index,
                });
            }
        }
        issues
    }
}

impl From<Vec<StyleDescriptor>> for StyleCatalog {
    fn from(styles: Vec<StyleDescriptor>) -> Self {
        StyleCatalog::new(styles)
    }
}

impl<'a> IntoIterator for &'a StyleCatalog {
    type Item = &'a StyleDescriptor;
    type IntoIter = std::slice::Iter<'a, StyleDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.styles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> StyleCatalog {
        StyleCatalog::new(vec![
            StyleDescriptor::new("streets", "Streets", "streets.png", "https://x/streets.json"),
            StyleDescriptor::new("satellite", "Satellite", "sat.png", "https://x/sat.json"),
            StyleDescriptor::new("dark", "Dark", "dark.png", "https://x/dark.json")
                .with_description("Dark theme style"),
        ])
    }

    #[test]
    fn test_find_and_first() {
        let catalog = sample_catalog();
        assert_eq!(catalog.first().map(|s| s.id.as_str()), Some("streets"));
        assert_eq!(
            catalog.find("satellite").map(|s| s.name.as_str()),
            Some("Satellite")
        );
        assert!(catalog.find("missing").is_none());
        assert!(!StyleCatalog::default().contains("streets"));
    }

    #[test]
    fn test_accessible_name_prefers_description() {
        let catalog = sample_catalog();
        assert_eq!(catalog.styles()[0].accessible_name(), "Streets");
        assert_eq!(catalog.styles()[2].accessible_name(), "Dark theme style");
    }

    #[test]
    fn test_issues_reports_empty_and_duplicate_ids() {
        let catalog = StyleCatalog::new(vec![
            StyleDescriptor::new("", "Invalid", "test.png", "test"),
            StyleDescriptor::new("a", "A", "a.png", "a.json"),
            StyleDescriptor::new("a", "A again", "a2.png", "a2.json"),
        ]);
        assert_eq!(
            catalog.issues(),
            vec![
                CatalogIssue::EmptyId { index: 0 },
                CatalogIssue::DuplicateId {
                    id: "a".to_string(),
                    index: 2
                },
            ]
        );
        assert!(sample_catalog().issues().is_empty());
    }

    #[test]
    fn test_descriptor_json_uses_camel_case() {
        let json = r#"[{"id":"osm","name":"OSM","image":"osm.png","styleUrl":"https://x/osm.json"}]"#;
        let catalog: StyleCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.styles()[0].style_url, "https://x/osm.json");
        assert!(catalog.styles()[0].description.is_none());

        let written = serde_json::to_string(&catalog).unwrap();
        assert!(written.contains("\"styleUrl\""));
        assert!(!written.contains("description"));
    }
}
