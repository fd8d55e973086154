use portfolio_protocol::SectionId;
use thiserror::Error;
use tracing::info;

use crate::base_path::{BasePath, HostEnvironment};
use crate::config::{ConfigError, SiteConfig};
use crate::contact::{ContactError, ContactState};
use crate::nav::{self, NavEntry};
use crate::projects::{Gallery, Project};
use crate::theme::ThemeState;
use crate::tracker::{SectionTracker, TrackerError};

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("tracker: {0}")]
    Tracker(#[from] TrackerError),
    #[error("contact: {0}")]
    Contact(#[from] ContactError),
}

/// All client-side state of one page view.
///
/// Owned by whoever renders the page and dropped with it; nothing here is
/// global.
#[derive(Debug)]
pub struct Portfolio {
    config: SiteConfig,
    tracker: SectionTracker,
    base_path: BasePath,
    contact: ContactState,
    gallery: Gallery,
    theme: ThemeState,
}

impl Portfolio {
    pub fn new(config: SiteConfig) -> Result<Self, PortfolioError> {
        config.validate()?;
        let tracker = SectionTracker::from_config(&config.tracker_config())?;
        let gallery = Gallery::new(config.projects.clone());
        let theme = ThemeState::new(config.theme);
        info!(
            title = %config.title,
            sections = config.sections.len(),
            projects = config.projects.len(),
            "portfolio page created"
        );
        Ok(Self {
            config,
            tracker,
            base_path: BasePath::new(),
            contact: ContactState::default(),
            gallery,
            theme,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, PortfolioError> {
        Self::new(SiteConfig::from_json(json)?)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn active_section(&self) -> &SectionId {
        self.tracker.active()
    }

    pub fn tracker(&self) -> &SectionTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut SectionTracker {
        &mut self.tracker
    }

    pub fn nav(&self) -> Vec<NavEntry<'_>> {
        nav::nav_entries(&self.config.nav, self.tracker.active())
    }

    pub fn base_path(&self) -> &str {
        self.base_path.get()
    }

    pub fn resolve_base_path(&self, env: &HostEnvironment) -> &str {
        self.base_path.resolve_once(&self.config.base_path, env)
    }

    pub fn asset_url(&self, path: &str) -> String {
        self.base_path.asset_url(path)
    }

    /// Favicon / avatar, served from the static root.
    pub fn avatar_url(&self) -> String {
        self.asset_url("/perfil.jpg")
    }

    pub fn contact(&self) -> &ContactState {
        &self.contact
    }

    pub fn contact_mut(&mut self) -> &mut ContactState {
        &mut self.contact
    }

    /// Submit the contact form to the configured chat number.
    pub fn submit_contact(&mut self, now_ms: f64) -> Result<String, PortfolioError> {
        Ok(self.contact.submit(&self.config.chat_number, now_ms)?)
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut Gallery {
        &mut self.gallery
    }

    pub fn project_image_url(&self, project: &Project) -> String {
        project.image_url(&self.base_path)
    }

    /// Image URLs of the projects under the current tab.
    pub fn visible_project_images(&self) -> Vec<String> {
        self.gallery
            .visible()
            .map(|p| self.project_image_url(p))
            .collect()
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeState {
        &mut self.theme
    }
}
