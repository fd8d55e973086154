use std::cell::OnceCell;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hostname of the static-pages deployment served under a sub-path.
pub const PAGES_HOST: &str = "neuradm.github.io";
/// Sub-path the site lives under on [`PAGES_HOST`].
pub const PAGES_SUB_PATH: &str = "/Portfolio";

/// What the resolver gets to look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEnvironment {
    /// Hostname read from the running page.
    Runtime { hostname: String },
    /// Build-time switch (`GITHUB_PAGES=true` when the site was built).
    BuildFlag(bool),
}

impl HostEnvironment {
    pub fn runtime(hostname: impl Into<String>) -> Self {
        Self::Runtime {
            hostname: hostname.into(),
        }
    }

    /// Flag baked in when this crate was compiled.
    pub fn from_build_env() -> Self {
        Self::BuildFlag(option_env!("GITHUB_PAGES") == Some("true"))
    }
}

/// Which host gets the sub-path prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasePathRule {
    pub pages_host: String,
    pub sub_path: String,
}

impl Default for BasePathRule {
    fn default() -> Self {
        Self {
            pages_host: PAGES_HOST.to_string(),
            sub_path: PAGES_SUB_PATH.to_string(),
        }
    }
}

impl BasePathRule {
    /// Prefix for `env`. Anything unrecognised falls back to the root.
    pub fn resolve(&self, env: &HostEnvironment) -> String {
        let sub_path_hosting = match env {
            HostEnvironment::Runtime { hostname } => {
                hostname.eq_ignore_ascii_case(&self.pages_host)
            }
            HostEnvironment::BuildFlag(flag) => *flag,
        };
        if sub_path_hosting {
            self.sub_path.trim_end_matches('/').to_string()
        } else {
            String::new()
        }
    }
}

/// URL prefix for static assets, computed at most once per page.
///
/// Reads return `""` until [`BasePath::resolve_once`] runs; the first
/// paint happens before the host environment exists and must render
/// root-relative URLs.
#[derive(Debug, Default, Clone)]
pub struct BasePath {
    value: OnceCell<String>,
}

impl BasePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Already-resolved prefix, mostly for tests and server rendering.
    pub fn fixed(prefix: impl Into<String>) -> Self {
        let value = OnceCell::new();
        let _ = value.set(prefix.into());
        Self { value }
    }

    pub fn get(&self) -> &str {
        self.value.get().map_or("", String::as_str)
    }

    pub fn is_resolved(&self) -> bool {
        self.value.get().is_some()
    }

    /// Resolve on the first call; later calls keep the first answer.
    pub fn resolve_once(&self, rule: &BasePathRule, env: &HostEnvironment) -> &str {
        self.value.get_or_init(|| {
            let prefix = rule.resolve(env);
            debug!(?env, prefix = %prefix, "resolved base path");
            prefix
        })
    }

    pub fn asset_url(&self, path: &str) -> String {
        asset_url(self.get(), path)
    }
}

/// Join `base` and `path` with exactly one slash.
///
/// Absolute and protocol-relative URLs pass through untouched.
pub fn asset_url(base: &str, path: &str) -> String {
    if is_absolute_url(path) {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

fn is_absolute_url(path: &str) -> bool {
    path.starts_with("//")
        || ["http:", "https:", "data:", "mailto:"]
            .iter()
            .any(|scheme| {
                path.get(..scheme.len())
                    .is_some_and(|p| p.eq_ignore_ascii_case(scheme))
            })
}
