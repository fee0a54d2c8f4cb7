use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/*
 * A shared, replaceable slot for a host callback. The control is handed a
 * fixed closure that reads the slot at call time, so the binding can swap the
 * callback without touching the control.
 */
pub struct CallbackCell<T: ?Sized> {
    slot: Rc<RefCell<Option<Rc<T>>>>,
}

impl<T: ?Sized> CallbackCell<T> {
    pub fn new(initial: Option<Rc<T>>) -> Self {
        CallbackCell {
            slot: Rc::new(RefCell::new(initial)),
        }
    }

    pub fn set(&self, callback: Option<Rc<T>>) {
        *self.slot.borrow_mut() = callback;
    }

    // Clones the current callback out, so no borrow is held while it runs.
    pub fn get(&self) -> Option<Rc<T>> {
        self.slot.borrow().clone()
    }

    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

impl<T: ?Sized> Clone for CallbackCell<T> {
    fn clone(&self) -> Self {
        CallbackCell {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: ?Sized> Default for CallbackCell<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T: ?Sized> fmt::Debug for CallbackCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackCell")
            .field("set", &self.is_set())
            .finish()
    }
}
