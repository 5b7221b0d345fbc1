//! Observer-pattern state containers mirroring the remote document store.
//!
//! Each store is a cheap-to-clone handle over a `tokio::sync::watch`
//! channel: subscribers always see the latest published value.

pub mod courses;
pub mod events;
pub mod modal;
pub mod session;

use std::sync::Arc;

use tokio::sync::watch;

pub use courses::{CoursesStore, LoadOutcome};
pub use events::EventsStore;
pub use modal::{ModalFlag, ModalStore};
pub use session::AuthSession;

#[derive(Debug)]
pub struct Store<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, modify: impl FnOnce(&mut T)) {
        self.tx.send_modify(modify);
    }

    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.tx.borrow())
    }
}

impl<T: Clone> Store<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let store: Store<Vec<u32>> = Store::default();
        let mut rx = store.subscribe();

        store.set(vec![1, 2]);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), vec![1, 2]);

        store.update(|items| items.push(3));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), vec![1, 2, 3]);
        assert_eq!(store.with(|items| items.len()), 3);
    }

    #[test]
    fn test_clones_share_state() {
        let store = Store::new(0u8);
        let other = store.clone();
        other.set(7);
        assert_eq!(store.get(), 7);
    }
}
