/*
 * The mutable state of a style switcher and the soft-misconfiguration
 * diagnostics collected while deriving it from the options.
 */
use crate::model::{CatalogIssue, ResolvedTheme, SwitcherOptions, resolve_theme};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    /// `None` only when the catalog is empty.
    pub active_style_id: Option<String>,
    pub expanded: bool,
    pub resolved_theme: ResolvedTheme,
}

// Non-fatal problems found in the options. Each one is also logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnknownActiveStyle { requested: String },
    EmptyStyleId { index: usize },
    DuplicateStyleId { id: String, index: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownActiveStyle { requested } => write!(
                f,
                "Active style id '{requested}' not found in styles, using the first style"
            ),
            Diagnostic::EmptyStyleId { index } => write!(f, "Style at index {index} has an empty id"),
            Diagnostic::DuplicateStyleId { id, index } => {
                write!(f, "Style at index {index} repeats the id '{id}'")
            }
        }
    }
}

impl From<CatalogIssue> for Diagnostic {
    fn from(issue: CatalogIssue) -> Self {
        match issue {
            CatalogIssue::EmptyId { index } => Diagnostic::EmptyStyleId { index },
            CatalogIssue::DuplicateId { id, index } => Diagnostic::DuplicateStyleId { id, index },
        }
    }
}

/*
 * Picks the style to show as active: the requested id when the catalog has
 * it, otherwise the first catalog entry. Returns `None` for an empty catalog,
 * and a diagnostic when a requested id had to be replaced.
 */
pub fn select_active_style(
    options: &SwitcherOptions,
    requested: Option<&str>,
) -> (Option<String>, Option<Diagnostic>) {
    let first = options.styles.first().map(|style| style.id.clone());
    match requested {
        Some(id) if options.styles.contains(id) => (Some(id.to_string()), None),
        Some(id) => {
            let diagnostic = Diagnostic::UnknownActiveStyle {
                requested: id.to_string(),
            };
            (first, Some(diagnostic))
        }
        None => (first, None),
    }
}

impl ControlState {
    /*
     * Derives the initial state from `options`. The control starts collapsed;
     * the theme is resolved against `os_prefers_dark` and re-resolved on
     * attach.
     */
    pub fn initial(options: &SwitcherOptions, os_prefers_dark: bool) -> (Self, Vec<Diagnostic>) {
        let mut diagnostics: Vec<Diagnostic> = options
            .styles
            .issues()
            .into_iter()
            .map(Diagnostic::from)
            .collect();
        let (active_style_id, unknown) =
            select_active_style(options, options.active_style_id.as_deref());
        diagnostics.extend(unknown);

        for diagnostic in &diagnostics {
            log::warn!("StyleSwitcher: {diagnostic}");
        }

        let state = ControlState {
            active_style_id,
            expanded: false,
            resolved_theme: resolve_theme(options.theme, os_prefers_dark),
        };
        (state, diagnostics)
    }
}
