mod console;
mod dom;
mod listener;

use std::cell::RefCell;
use std::rc::Rc;

use portfolio_core::contact::{ContactField, ContactForm, FormStatus};
use portfolio_core::projects::{CategoryFilter, Project};
use portfolio_core::{BasePathRule, HostEnvironment, Observation, Portfolio, SiteConfig};
use portfolio_protocol::VisibilityEntry;
use serde::Serialize;
use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;

use crate::dom::DomObserver;
use crate::listener::ListenerSlot;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console::init_logging();
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Base path the default rule picks for `hostname`.
#[wasm_bindgen]
pub fn base_path_for_host(hostname: &str) -> String {
    BasePathRule::default().resolve(&HostEnvironment::runtime(hostname))
}

/// Base path selected by the `GITHUB_PAGES` flag at build time.
#[wasm_bindgen]
pub fn build_base_path() -> String {
    BasePathRule::default().resolve(&HostEnvironment::from_build_env())
}

/// Chat link for a message, without touching any page state.
#[wasm_bindgen]
pub fn chat_link(number: &str, name: &str, email: &str, message: &str) -> Result<String, JsError> {
    let form = ContactForm {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
    };
    form.chat_link(number).map_err(js_error)
}

#[derive(Serialize)]
struct ProjectView<'a> {
    #[serde(flatten)]
    project: &'a Project,
    image_url: String,
}

/// One page view, owned by the JS side.
///
/// Call `mount()` once the DOM exists and `unmount()` (or `free()`) when
/// the view goes away; either releases the intersection observer.
#[wasm_bindgen]
pub struct PortfolioHandle {
    page: Rc<RefCell<Portfolio>>,
    listener: ListenerSlot<js_sys::Function>,
    observation: Option<Observation<DomObserver>>,
}

#[wasm_bindgen]
impl PortfolioHandle {
    /// Build from a JSON site config, or the shipped defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PortfolioHandle, JsError> {
        let config = match config_json {
            Some(json) => SiteConfig::from_json(&json).map_err(js_error)?,
            None => SiteConfig::default(),
        };
        let page = Portfolio::new(config).map_err(js_error)?;
        Ok(Self {
            page: Rc::new(RefCell::new(page)),
            listener: ListenerSlot::default(),
            observation: None,
        })
    }

    /// Resolve the base path from `location.hostname` and start tracking.
    pub fn mount(&mut self) -> Result<(), JsError> {
        if self.observation.is_some() {
            return Ok(());
        }

        let hostname = web_sys::window()
            .and_then(|w| w.location().hostname().ok())
            .unwrap_or_default();
        let threshold = {
            let page = self.page.borrow();
            let base = page.resolve_base_path(&HostEnvironment::runtime(hostname.as_str()));
            info!(%hostname, base_path = %base, "base path resolved");
            page.tracker().threshold()
        };

        let page = Rc::clone(&self.page);
        let listener = self.listener.clone();
        let observer = DomObserver::new(threshold, move |batch: Vec<VisibilityEntry>| {
            let changed = match page.try_borrow_mut() {
                Ok(mut page) => page.tracker_mut().handle_batch(&batch),
                Err(_) => {
                    warn!(entries = batch.len(), "page busy, dropping visibility batch");
                    return;
                }
            };
            let Some(id) = changed else { return };
            let result = listener.notify(|f| f.call1(&JsValue::NULL, &JsValue::from_str(&id)));
            if let Some(Err(e)) = result {
                error!(section = %id, error = ?e, "section listener failed");
            }
        })
        .map_err(|e| JsError::new(&format!("failed to create observer: {e:?}")))?;

        let mut page = self.page.borrow_mut();
        page.theme_mut().mount();
        self.observation = Some(page.tracker_mut().observe(observer).map_err(js_error)?);
        Ok(())
    }

    /// Stop tracking. Safe to call more than once.
    pub fn unmount(&mut self) {
        if let Some(observation) = self.observation.take() {
            self.page.borrow_mut().tracker_mut().teardown(observation);
            info!("page unmounted");
        }
    }

    pub fn active_section(&self) -> String {
        self.page.borrow().active_section().to_string()
    }

    /// Register `f(sectionId)` to run whenever the active section changes.
    pub fn on_section_change(&self, f: js_sys::Function) {
        self.listener.set(f);
    }

    pub fn off_section_change(&self) {
        self.listener.clear();
    }

    pub fn nav_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.page.borrow().nav()).map_err(js_error)
    }

    pub fn base_path(&self) -> String {
        self.page.borrow().base_path().to_string()
    }

    pub fn asset_url(&self, path: &str) -> String {
        self.page.borrow().asset_url(path)
    }

    pub fn set_contact_field(&self, name: &str, value: String) -> Result<(), JsError> {
        let field = ContactField::from_input_name(name)
            .ok_or_else(|| JsError::new(&format!("unknown contact field: {name}")))?;
        self.page.borrow_mut().contact_mut().set_field(field, value);
        Ok(())
    }

    /// Validate the form and open the chat link in a new tab.
    ///
    /// Returns `"success"` or `"error"`; validation failures are a form
    /// state, not an exception.
    pub fn submit_contact(&self, now_ms: f64) -> Result<String, JsError> {
        let result = self.page.borrow_mut().submit_contact(now_ms);
        match result {
            Ok(link) => {
                if let Some(window) = web_sys::window() {
                    window
                        .open_with_url_and_target(&link, "_blank")
                        .map_err(|e| JsError::new(&format!("failed to open chat link: {e:?}")))?;
                }
                Ok("success".to_string())
            }
            Err(_) => Ok("error".to_string()),
        }
    }

    /// Banner to show at `now_ms`, if any.
    pub fn contact_status(&self, now_ms: f64) -> Option<String> {
        self.page
            .borrow()
            .contact()
            .status(now_ms)
            .map(|s| match s {
                FormStatus::Success => "success".to_string(),
                FormStatus::Error => "error".to_string(),
            })
    }

    /// Flip the theme and return the new class name.
    pub fn toggle_theme(&self) -> String {
        self.page.borrow_mut().theme_mut().toggle().class_name().to_string()
    }

    pub fn theme_icon(&self) -> String {
        match self.page.borrow().theme().icon() {
            portfolio_core::theme::ThemeIcon::Sun => "sun".to_string(),
            portfolio_core::theme::ThemeIcon::Moon => "moon".to_string(),
        }
    }

    /// Select a gallery tab by key (`all`, `web`, `ai`, `data`).
    pub fn select_category(&self, key: &str) -> Result<(), JsError> {
        let filter = CategoryFilter::from_key(key)
            .ok_or_else(|| JsError::new(&format!("unknown category: {key}")))?;
        self.page.borrow_mut().gallery_mut().select(filter);
        Ok(())
    }

    /// Projects under the current tab, with resolved image URLs.
    pub fn visible_projects_json(&self) -> Result<String, JsError> {
        let page = self.page.borrow();
        let views: Vec<ProjectView<'_>> = page
            .gallery()
            .visible()
            .map(|project| ProjectView {
                project,
                image_url: page.project_image_url(project),
            })
            .collect();
        serde_json::to_string(&views).map_err(js_error)
    }
}

impl Drop for PortfolioHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}
