use portfolio_protocol::{SectionId, ThemeMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::base_path::BasePathRule;
use crate::contact::DEFAULT_CHAT_NUMBER;
use crate::nav::{self, NavItem};
use crate::projects::{self, Project};
use crate::tracker::{DEFAULT_THRESHOLD, TrackerConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid site config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("at least one section is required")]
    NoSections,
    #[error("default section `{0}` is not one of the sections")]
    UnknownDefault(String),
    #[error("nav item `{label}` targets unknown section `{target}`")]
    UnknownNavTarget { label: String, target: String },
    #[error("visibility threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("base path rule: {0}")]
    InvalidBasePath(String),
}

/// Everything that varies between deployments of the site.
///
/// Missing keys take the shipped defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    /// Region ids in page order.
    pub sections: Vec<String>,
    pub default_section: String,
    pub visibility_threshold: f64,
    pub base_path: BasePathRule,
    pub chat_number: String,
    pub theme: ThemeMode,
    pub nav: Vec<NavItem>,
    pub projects: Vec<Project>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Juan-Dev-Portfolio".to_string(),
            description: "Portfolio website for a software engineer showcasing projects and skills"
                .to_string(),
            sections: ["home", "about", "projects", "contact"]
                .map(String::from)
                .to_vec(),
            default_section: "home".to_string(),
            visibility_threshold: DEFAULT_THRESHOLD,
            base_path: BasePathRule::default(),
            chat_number: DEFAULT_CHAT_NUMBER.to_string(),
            theme: ThemeMode::Light,
            nav: nav::default_items(),
            projects: projects::default_catalog(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.visibility_threshold;
        if !t.is_finite() || t <= 0.0 || t > 1.0 {
            return Err(ConfigError::InvalidThreshold(t));
        }
        self.validate_base_path()?;
        if self.sections.is_empty() {
            return Err(ConfigError::NoSections);
        }
        if !self.sections.contains(&self.default_section) {
            return Err(ConfigError::UnknownDefault(self.default_section.clone()));
        }
        if let Some(item) = self
            .nav
            .iter()
            .find(|item| !self.sections.iter().any(|s| item.target == s.as_str()))
        {
            return Err(ConfigError::UnknownNavTarget {
                label: item.label.clone(),
                target: item.target.to_string(),
            });
        }
        Ok(())
    }

    /// The prefix must be root-relative and the host a bare hostname.
    ///
    /// An empty host would match `file://` pages (hostname `""`), and a
    /// relative or protocol-relative sub-path would send assets elsewhere.
    fn validate_base_path(&self) -> Result<(), ConfigError> {
        let rule = &self.base_path;
        let host = rule.pages_host.as_str();
        if host.trim().is_empty() {
            return Err(ConfigError::InvalidBasePath("pages_host is empty".into()));
        }
        if host.contains(|c: char| c.is_whitespace() || matches!(c, '/' | ':' | '?' | '#')) {
            return Err(ConfigError::InvalidBasePath(format!(
                "pages_host `{host}` is not a bare hostname"
            )));
        }
        let sub_path = rule.sub_path.as_str();
        if !sub_path.is_empty() && (!sub_path.starts_with('/') || sub_path.starts_with("//")) {
            return Err(ConfigError::InvalidBasePath(format!(
                "sub_path `{sub_path}` must start with a single `/`"
            )));
        }
        Ok(())
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            sections: self.sections.iter().map(|s| SectionId::from(s.as_str())).collect(),
            default_section: SectionId::from(self.default_section.as_str()),
            threshold: self.visibility_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = SiteConfig::from_json("{}").expect("empty object is valid");
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn overrides_merge_with_defaults() {
        let json = r#"{
            "chat_number": "34600000000",
            "base_path": { "pages_host": "me.github.io" }
        }"#;
        let config = SiteConfig::from_json(json).expect("overrides are valid");
        assert_eq!(config.chat_number, "34600000000");
        assert_eq!(config.base_path.pages_host, "me.github.io");
        assert_eq!(config.base_path.sub_path, "/Portfolio");
        assert_eq!(config.sections.len(), 4);
    }

    #[test]
    fn rejects_unknown_default() {
        let json = r#"{ "default_section": "hero" }"#;
        assert!(matches!(
            SiteConfig::from_json(json),
            Err(ConfigError::UnknownDefault(s)) if s == "hero"
        ));
    }

    #[test]
    fn rejects_dangling_nav_target() {
        let json = r#"{ "sections": ["home", "about"] }"#;
        assert!(matches!(
            SiteConfig::from_json(json),
            Err(ConfigError::UnknownNavTarget { target, .. }) if target == "projects"
        ));
    }

    #[test]
    fn rejects_bad_threshold_and_syntax() {
        assert!(matches!(
            SiteConfig::from_json(r#"{ "visibility_threshold": 1.5 }"#),
            Err(ConfigError::InvalidThreshold(_))
        ));
        assert!(matches!(
            SiteConfig::from_json("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn rejects_base_path_rules_that_point_nowhere() {
        for json in [
            r#"{ "base_path": { "pages_host": "" } }"#,
            r#"{ "base_path": { "pages_host": "https://neuradm.github.io" } }"#,
            r#"{ "base_path": { "sub_path": "Portfolio" } }"#,
            r#"{ "base_path": { "sub_path": "//cdn.example.com" } }"#,
        ] {
            assert!(
                matches!(SiteConfig::from_json(json), Err(ConfigError::InvalidBasePath(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn empty_sub_path_is_root_hosting() {
        let json = r#"{ "base_path": { "sub_path": "" } }"#;
        let config = SiteConfig::from_json(json).expect("empty sub_path is valid");
        assert_eq!(config.base_path.sub_path, "");
    }

    #[test]
    fn tracker_config_projects_fields() {
        let tracker = SiteConfig::default().tracker_config();
        assert_eq!(tracker.default_section, "home");
        assert_eq!(tracker.sections[2], "projects");
        assert!((tracker.threshold - 0.5).abs() < f64::EPSILON);
    }
}
