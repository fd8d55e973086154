use portfolio_core::VisibilityObserver;
use portfolio_protocol::{SectionId, VisibilityEntry};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

type BatchCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// `IntersectionObserver` over the page's `<section>` elements.
///
/// Regions are looked up by element id at observe/unobserve time; ids with
/// no element are skipped. Dropping the observer disconnects it.
pub struct DomObserver {
    document: Document,
    inner: IntersectionObserver,
    // Must outlive `inner`; the browser holds a raw reference to it.
    _callback: BatchCallback,
}

impl DomObserver {
    pub fn new(
        threshold: f64,
        mut on_batch: impl FnMut(Vec<VisibilityEntry>) + 'static,
    ) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let callback: BatchCallback = Closure::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let batch = entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|e| {
                        VisibilityEntry::new(
                            e.target().id(),
                            e.intersection_ratio(),
                            e.is_intersecting(),
                        )
                    })
                    .collect();
                on_batch(batch);
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let inner = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        Ok(Self {
            document,
            inner,
            _callback: callback,
        })
    }
}

impl VisibilityObserver for DomObserver {
    fn observe(&mut self, id: &SectionId) {
        match self.document.get_element_by_id(id) {
            Some(element) => self.inner.observe(&element),
            None => warn!(section = %id, "no element to observe"),
        }
    }

    fn unobserve(&mut self, id: &SectionId) {
        if let Some(element) = self.document.get_element_by_id(id) {
            self.inner.unobserve(&element);
        }
    }
}

impl Drop for DomObserver {
    fn drop(&mut self) {
        self.inner.disconnect();
    }
}
