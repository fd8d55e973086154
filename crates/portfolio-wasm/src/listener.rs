use std::cell::RefCell;
use std::rc::Rc;

/// Shared slot for the JS section-change callback.
///
/// The callback is cloned out before it runs, so it may replace or clear
/// the slot (re-subscribe, unsubscribe) from inside the call.
pub struct ListenerSlot<F> {
    inner: Rc<RefCell<Option<F>>>,
}

impl<F> Clone for ListenerSlot<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<F> Default for ListenerSlot<F> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(None)),
        }
    }
}

impl<F: Clone> ListenerSlot<F> {
    pub fn set(&self, listener: F) {
        *self.inner.borrow_mut() = Some(listener);
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().take();
    }

    pub fn current(&self) -> Option<F> {
        self.inner.borrow().clone()
    }

    /// Run `call` with the current listener, holding no borrow of the slot.
    pub fn notify<R>(&self, call: impl FnOnce(&F) -> R) -> Option<R> {
        let listener = self.current()?;
        Some(call(&listener))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Callback = Rc<dyn Fn(&str)>;

    #[test]
    fn notify_without_listener_is_noop() {
        let slot: ListenerSlot<Callback> = ListenerSlot::default();
        assert!(slot.notify(|f| f("about")).is_none());
    }

    #[test]
    fn listener_can_replace_itself_during_notify() {
        let slot: ListenerSlot<Callback> = ListenerSlot::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let second: Callback = {
            let seen = Rc::clone(&seen);
            Rc::new(move |id: &str| seen.borrow_mut().push(format!("second:{id}")))
        };
        let first: Callback = {
            let seen = Rc::clone(&seen);
            let slot = slot.clone();
            Rc::new(move |id: &str| {
                seen.borrow_mut().push(format!("first:{id}"));
                slot.set(Rc::clone(&second));
            })
        };
        slot.set(first);

        slot.notify(|f| f("about"));
        slot.notify(|f| f("projects"));
        assert_eq!(*seen.borrow(), ["first:about", "second:projects"]);
    }

    #[test]
    fn listener_can_unsubscribe_during_notify() {
        let slot: ListenerSlot<Callback> = ListenerSlot::default();
        let unsubscribe: Callback = {
            let slot = slot.clone();
            Rc::new(move |_: &str| slot.clear())
        };
        slot.set(unsubscribe);

        assert!(slot.notify(|f| f("contact")).is_some());
        assert!(slot.current().is_none());
    }
}
