// ============================================================================
// REACTIVITY - Sistema de notificaciones/subscribers para reactividad
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

/// Estado reactivo con sistema de notificaciones
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<Callback>>>,
}

impl<T> ReactiveState<T> {
    /// Crear nuevo estado reactivo
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Leer el valor sin clonarlo
    pub fn with<R>(&self, reader: impl FnOnce(&T) -> R) -> R {
        reader(&self.value.borrow())
    }

    /// Establecer nuevo valor y notificar subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Suscribirse a cambios
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// Notificar a todos los subscribers.
    /// Se copia la lista para que un subscriber pueda leer o suscribir sin pánico.
    fn notify(&self) {
        let subscribers: Vec<Callback> = self.subscribers.borrow().clone();
        for callback in subscribers {
            callback();
        }
    }
}

impl<T: Clone> ReactiveState<T> {
    /// Copia del valor actual
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}

// Los clones comparten valor y subscribers
impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_set_notifies_subscribers() {
        let state = ReactiveState::new(0);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        state.subscribe(move || counter.set(counter.get() + 1));

        state.set(5);
        state.set(6);

        assert_eq!(state.get(), 6);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_subscriber_can_read_value() {
        let state = ReactiveState::new(String::from("a"));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (reader, log) = (state.clone(), seen.clone());
        state.subscribe(move || log.borrow_mut().push(reader.get()));

        state.set("b".to_string());
        assert_eq!(*seen.borrow(), vec!["b".to_string()]);
        assert!(state.with(|v| v == "b"));
    }
}
