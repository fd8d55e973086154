use portfolio_protocol::SectionId;
use serde::{Deserialize, Serialize};

/// One navigation button and the section it scrolls to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub target: SectionId,
}

impl NavItem {
    pub fn new(label: impl Into<String>, target: impl Into<SectionId>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }

    pub fn href(&self) -> String {
        self.target.anchor()
    }
}

/// Navigation bar shipped with the site.
pub fn default_items() -> Vec<NavItem> {
    vec![
        NavItem::new("Inicio", "home"),
        NavItem::new("Acerca De", "about"),
        NavItem::new("Proyectos", "projects"),
        NavItem::new("Contacto", "contact"),
    ]
}

/// A nav item resolved against the active section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry<'a> {
    pub label: &'a str,
    pub target: &'a SectionId,
    pub is_current: bool,
}

/// Mark the item whose target is `active`.
///
/// Matching is by section id, never by label, so translated labels still
/// highlight.
pub fn nav_entries<'a>(items: &'a [NavItem], active: &SectionId) -> Vec<NavEntry<'a>> {
    items
        .iter()
        .map(|item| NavEntry {
            label: &item.label,
            target: &item.target,
            is_current: item.target == *active,
        })
        .collect()
}
