/*
 * The OS color-scheme preference as an injected capability. A control in
 * `auto` theme mode asks the provider whether dark mode is preferred and
 * subscribes for changes while it is attached to a map.
 *
 * Two providers are supplied: `FixedColorScheme` for hosts without any OS
 * signal, and `ManualColorScheme` for hosts that forward the preference
 * themselves (and for tests).
 */
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

// Invoked with the new "prefers dark" value whenever the preference changes.
pub type ColorSchemeListener = Rc<dyn Fn(bool)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub trait ColorSchemeProvider {
    fn prefers_dark(&self) -> bool;

    fn subscribe(&self, listener: ColorSchemeListener) -> SubscriptionId;

    // Unknown or already removed ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

// A preference that never changes. Subscriptions are accepted and never fire.
#[derive(Debug, Default)]
pub struct FixedColorScheme {
    prefers_dark: bool,
    next_id: Cell<u64>,
}

impl FixedColorScheme {
    pub fn new(prefers_dark: bool) -> Self {
        FixedColorScheme {
            prefers_dark,
            next_id: Cell::new(0),
        }
    }
}

impl ColorSchemeProvider for FixedColorScheme {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    fn subscribe(&self, _listener: ColorSchemeListener) -> SubscriptionId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        SubscriptionId(id)
    }

    fn unsubscribe(&self, _id: SubscriptionId) {}
}

/*
 * A host-driven preference. `set_prefers_dark` notifies every subscriber
 * synchronously, in subscription order, but only when the value actually
 * changes.
 */
#[derive(Default)]
pub struct ManualColorScheme {
    prefers_dark: Cell<bool>,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, ColorSchemeListener)>>,
}

impl ManualColorScheme {
    pub fn new(prefers_dark: bool) -> Self {
        ManualColorScheme {
            prefers_dark: Cell::new(prefers_dark),
            ..Default::default()
        }
    }

    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        if self.prefers_dark.replace(prefers_dark) == prefers_dark {
            return;
        }
        log::debug!("ManualColorScheme: preference changed, prefers_dark={prefers_dark}");
        // Snapshot so listeners may subscribe or unsubscribe while being notified.
        let listeners: Vec<ColorSchemeListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(prefers_dark);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl ColorSchemeProvider for ManualColorScheme {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark.get()
    }

    fn subscribe(&self, listener: ColorSchemeListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }
}

impl fmt::Debug for ManualColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualColorScheme")
            .field("prefers_dark", &self.prefers_dark.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheme_notifies_on_change_only() {
        let scheme = ManualColorScheme::new(false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_listener = Rc::clone(&seen);
        let id = scheme.subscribe(Rc::new(move |dark| seen_in_listener.borrow_mut().push(dark)));

        scheme.set_prefers_dark(true);
        scheme.set_prefers_dark(true);
        scheme.set_prefers_dark(false);
        assert_eq!(*seen.borrow(), vec![true, false]);

        scheme.unsubscribe(id);
        assert_eq!(scheme.subscriber_count(), 0);
        scheme.set_prefers_dark(true);
        assert_eq!(seen.borrow().len(), 2);
        assert!(scheme.prefers_dark());
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let scheme = Rc::new(ManualColorScheme::new(false));
        let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
        let scheme_in_listener = Rc::clone(&scheme);
        let id_in_listener = Rc::clone(&own_id);
        let id = scheme.subscribe(Rc::new(move |_| {
            if let Some(id) = id_in_listener.get() {
                scheme_in_listener.unsubscribe(id);
            }
        }));
        own_id.set(Some(id));

        scheme.set_prefers_dark(true);
        assert_eq!(scheme.subscriber_count(), 0);
    }

    #[test]
    fn test_fixed_scheme() {
        let scheme = FixedColorScheme::new(true);
        assert!(scheme.prefers_dark());
        let a = scheme.subscribe(Rc::new(|_| {}));
        let b = scheme.subscribe(Rc::new(|_| {}));
        assert_ne!(a, b);
        scheme.unsubscribe(a);
    }
}
