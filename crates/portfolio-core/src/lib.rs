//! Client-side state for the portfolio page.
//!
//! Two behaviors carry the logic: [`tracker::SectionTracker`] keeps the
//! highlighted nav item in sync with scrolling, and [`base_path::BasePath`]
//! prefixes static asset URLs for root or sub-path hosting. The rest is
//! small form, gallery and theme state owned by [`page::Portfolio`].

pub mod base_path;
pub mod config;
pub mod contact;
pub mod nav;
pub mod page;
pub mod projects;
pub mod theme;
pub mod tracker;

pub use base_path::{BasePath, BasePathRule, HostEnvironment};
pub use config::{ConfigError, SiteConfig};
pub use page::{Portfolio, PortfolioError};
pub use tracker::{Observation, SectionTracker, VisibilityObserver};
