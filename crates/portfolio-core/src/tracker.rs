use std::collections::HashSet;

use portfolio_protocol::{SectionId, VisibilityEntry};
use thiserror::Error;
use tracing::{debug, warn};

/// Fraction of a region that must be on screen for it to become active.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum TrackerError {
    #[error("no sections registered")]
    NoSections,
    #[error("section `{0}` registered twice")]
    DuplicateSection(SectionId),
    #[error("default section `{0}` is not registered")]
    UnknownDefault(SectionId),
    #[error("visibility threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("sections are already being observed")]
    AlreadyObserving,
}

/// A page region registered with the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
}

impl Section {
    pub fn new(id: impl Into<SectionId>) -> Self {
        Self { id: id.into() }
    }
}

/// Tracker inputs, usually projected out of the site config.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub sections: Vec<SectionId>,
    pub default_section: SectionId,
    pub threshold: f64,
}

/// Source of intersection notifications for a set of regions.
///
/// Implementations look regions up by id. `unobserve` must tolerate ids
/// whose region has already disappeared and must be safe to repeat.
pub trait VisibilityObserver {
    fn observe(&mut self, id: &SectionId);
    fn unobserve(&mut self, id: &SectionId);
}

/// Scoped registration of every tracked region with an observer.
///
/// Dropping the handle unregisters all regions, so observation never
/// outlives the page even on early returns.
#[derive(Debug)]
pub struct Observation<O: VisibilityObserver> {
    observer: O,
    registered: Vec<SectionId>,
}

impl<O: VisibilityObserver> Observation<O> {
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Ids still registered with the observer.
    pub fn registered(&self) -> &[SectionId] {
        &self.registered
    }

    /// Unregister every region now instead of at scope exit.
    pub fn release(mut self) {
        self.unobserve_all();
    }

    fn unobserve_all(&mut self) {
        for id in self.registered.drain(..) {
            self.observer.unobserve(&id);
        }
    }
}

impl<O: VisibilityObserver> Drop for Observation<O> {
    fn drop(&mut self) {
        self.unobserve_all();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, no observer attached yet.
    Idle,
    Observing,
    /// Torn down; late notifications are dropped.
    TornDown,
}

/// Keeps the active navigation section in sync with scroll position.
///
/// The active id starts at the configured default and is replaced by the
/// id of every entry that crosses the threshold, in delivery order.
#[derive(Debug, Clone)]
pub struct SectionTracker {
    sections: Vec<Section>,
    threshold: f64,
    active: SectionId,
    lifecycle: Lifecycle,
}

impl SectionTracker {
    pub fn new(
        sections: Vec<Section>,
        default: impl Into<SectionId>,
        threshold: f64,
    ) -> Result<Self, TrackerError> {
        if sections.is_empty() {
            return Err(TrackerError::NoSections);
        }
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(TrackerError::InvalidThreshold(threshold));
        }
        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(section.id.as_str()) {
                return Err(TrackerError::DuplicateSection(section.id.clone()));
            }
        }
        let default = default.into();
        if !seen.contains(default.as_str()) {
            return Err(TrackerError::UnknownDefault(default));
        }

        Ok(Self {
            sections,
            threshold,
            active: default,
            lifecycle: Lifecycle::Idle,
        })
    }

    pub fn from_config(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let sections = config.sections.iter().cloned().map(Section::new).collect();
        Self::new(sections, config.default_section.clone(), config.threshold)
    }

    /// Currently highlighted section. Always a registered id.
    pub fn active(&self) -> &SectionId {
        &self.active
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.sections.iter().any(|s| s.id == id)
    }

    /// Register every section with `observer`, in order.
    ///
    /// Only one observation may be live at a time; tear the current one
    /// down before observing again.
    pub fn observe<O: VisibilityObserver>(
        &mut self,
        mut observer: O,
    ) -> Result<Observation<O>, TrackerError> {
        if self.lifecycle == Lifecycle::Observing {
            return Err(TrackerError::AlreadyObserving);
        }
        let registered: Vec<SectionId> = self.sections.iter().map(|s| s.id.clone()).collect();
        for id in &registered {
            observer.observe(id);
        }
        debug!(count = registered.len(), "observing sections");
        self.lifecycle = Lifecycle::Observing;
        Ok(Observation {
            observer,
            registered,
        })
    }

    /// Apply one batch of notifications.
    ///
    /// The last crossing entry in delivery order wins; there is no
    /// positional tie-break. Returns the new active id if it changed.
    pub fn handle_batch(&mut self, entries: &[VisibilityEntry]) -> Option<SectionId> {
        if self.lifecycle != Lifecycle::Observing {
            debug!(
                lifecycle = ?self.lifecycle,
                entries = entries.len(),
                "ignoring visibility batch"
            );
            return None;
        }

        let previous = self.active.clone();
        for entry in entries {
            if !entry.crosses(self.threshold) {
                continue;
            }
            match self.sections.iter().find(|s| s.id == entry.id) {
                Some(section) => self.active = section.id.clone(),
                None => warn!(id = %entry.id, "visibility entry for unregistered section"),
            }
        }

        if self.active != previous {
            debug!(from = %previous, to = %self.active, "active section changed");
            Some(self.active.clone())
        } else {
            None
        }
    }

    /// Release `observation` and stop reacting to notifications.
    pub fn teardown<O: VisibilityObserver>(&mut self, observation: Observation<O>) {
        observation.release();
        if self.lifecycle != Lifecycle::TornDown {
            debug!("section tracker torn down");
        }
        self.lifecycle = Lifecycle::TornDown;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Observer that records calls instead of touching a page.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingObserver {
        pub observed: Vec<String>,
        pub unobserved: Vec<String>,
    }

    impl VisibilityObserver for RecordingObserver {
        fn observe(&mut self, id: &SectionId) {
            self.observed.push(id.to_string());
        }

        fn unobserve(&mut self, id: &SectionId) {
            self.unobserved.push(id.to_string());
        }
    }

    impl VisibilityObserver for &mut RecordingObserver {
        fn observe(&mut self, id: &SectionId) {
            (**self).observe(id);
        }

        fn unobserve(&mut self, id: &SectionId) {
            (**self).unobserve(id);
        }
    }

    fn page_tracker() -> SectionTracker {
        let sections = ["home", "about", "projects", "contact"]
            .into_iter()
            .map(Section::new)
            .collect();
        SectionTracker::new(sections, "home", DEFAULT_THRESHOLD)
            .expect("valid tracker config")
    }

    fn hit(id: &str) -> VisibilityEntry {
        VisibilityEntry::new(id, 0.8, true)
    }

    #[test]
    fn starts_at_default() {
        let tracker = page_tracker();
        assert_eq!(tracker.active(), "home");
        assert_eq!(tracker.lifecycle(), Lifecycle::Idle);
    }

    #[test]
    fn last_crossing_in_batch_wins() {
        let mut tracker = page_tracker();
        let _obs = tracker
            .observe(RecordingObserver::default())
            .expect("tracker is idle");
        let changed = tracker.handle_batch(&[hit("about"), hit("projects")]);
        assert_eq!(changed.as_deref(), Some("projects"));
        assert_eq!(tracker.active(), "projects");
    }

    #[test]
    fn later_batches_override_earlier() {
        let mut tracker = page_tracker();
        let _obs = tracker
            .observe(RecordingObserver::default())
            .expect("tracker is idle");
        tracker.handle_batch(&[hit("contact")]);
        tracker.handle_batch(&[hit("about")]);
        assert_eq!(tracker.active(), "about");
    }

    #[test]
    fn below_threshold_is_ignored() {
        let mut tracker = page_tracker();
        let _obs = tracker
            .observe(RecordingObserver::default())
            .expect("tracker is idle");
        let changed = tracker.handle_batch(&[
            VisibilityEntry::new("about", 0.49, true),
            VisibilityEntry::new("projects", 0.9, false),
        ]);
        assert!(changed.is_none());
        assert_eq!(tracker.active(), "home");
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut tracker = page_tracker();
        let _obs = tracker
            .observe(RecordingObserver::default())
            .expect("tracker is idle");
        tracker.handle_batch(&[VisibilityEntry::new("contact", 0.5, true)]);
        assert_eq!(tracker.active(), "contact");
    }

    #[test]
    fn unregistered_ids_are_skipped() {
        let mut tracker = page_tracker();
        let _obs = tracker
            .observe(RecordingObserver::default())
            .expect("tracker is idle");
        tracker.handle_batch(&[hit("about"), hit("footer")]);
        assert_eq!(tracker.active(), "about");
    }

    #[test]
    fn reentering_same_section_reports_no_change() {
        let mut tracker = page_tracker();
        let _obs = tracker
            .observe(RecordingObserver::default())
            .expect("tracker is idle");
        assert!(tracker.handle_batch(&[hit("about")]).is_some());
        assert!(tracker.handle_batch(&[hit("about")]).is_none());
    }

    #[test]
    fn batches_before_observe_are_ignored() {
        let mut tracker = page_tracker();
        assert!(tracker.handle_batch(&[hit("about")]).is_none());
        assert_eq!(tracker.active(), "home");
    }

    #[test]
    fn teardown_ignores_late_events() {
        let mut tracker = page_tracker();
        let obs = tracker
            .observe(RecordingObserver::default())
            .expect("tracker is idle");
        tracker.handle_batch(&[hit("about")]);
        tracker.teardown(obs);
        assert!(tracker.handle_batch(&[hit("contact")]).is_none());
        assert_eq!(tracker.active(), "about");
        assert_eq!(tracker.lifecycle(), Lifecycle::TornDown);
    }

    #[test]
    fn observe_registers_in_order_and_drop_unregisters() {
        let mut recorder = RecordingObserver::default();
        let mut tracker = page_tracker();
        {
            let obs = tracker.observe(&mut recorder).expect("tracker is idle");
            assert_eq!(obs.registered().len(), 4);
        }
        assert_eq!(recorder.observed, ["home", "about", "projects", "contact"]);
        assert_eq!(recorder.unobserved, recorder.observed);
    }

    #[test]
    fn release_unregisters_exactly_once() {
        let mut recorder = RecordingObserver::default();
        let mut tracker = page_tracker();
        let obs = tracker.observe(&mut recorder).expect("tracker is idle");
        tracker.teardown(obs);
        assert_eq!(recorder.unobserved.len(), 4);
    }

    #[test]
    fn second_observe_is_rejected_while_observing() {
        let mut recorder = RecordingObserver::default();
        let mut other = RecordingObserver::default();
        let mut tracker = page_tracker();
        let obs = tracker.observe(&mut recorder).expect("tracker is idle");
        assert!(matches!(
            tracker.observe(&mut other),
            Err(TrackerError::AlreadyObserving)
        ));
        assert!(other.observed.is_empty());
        assert_eq!(tracker.lifecycle(), Lifecycle::Observing);

        tracker.teardown(obs);
        let again = tracker.observe(&mut other).expect("torn down tracker can observe again");
        assert_eq!(again.registered().len(), 4);
        assert_eq!(tracker.lifecycle(), Lifecycle::Observing);
    }

    #[test]
    fn rejects_bad_construction() {
        assert_eq!(
            SectionTracker::new(vec![], "home", 0.5).err(),
            Some(TrackerError::NoSections)
        );
        assert_eq!(
            SectionTracker::new(vec![Section::new("home")], "about", 0.5).err(),
            Some(TrackerError::UnknownDefault("about".into()))
        );
        assert_eq!(
            SectionTracker::new(vec![Section::new("a"), Section::new("a")], "a", 0.5).err(),
            Some(TrackerError::DuplicateSection("a".into()))
        );
        assert!(matches!(
            SectionTracker::new(vec![Section::new("a")], "a", 0.0),
            Err(TrackerError::InvalidThreshold(_))
        ));
        assert!(matches!(
            SectionTracker::new(vec![Section::new("a")], "a", f64::NAN),
            Err(TrackerError::InvalidThreshold(_))
        ));
    }
}
