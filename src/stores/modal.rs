use tokio::sync::watch;

use super::Store;

/// Single-slot modal state: at most one active modal name.
#[derive(Debug, Clone, Default)]
pub struct ModalStore {
    active: Store<Option<String>>,
}

impl ModalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `name`, replacing whatever modal was active.
    pub fn set_active_modal(&self, name: impl Into<String>) {
        self.active.set(Some(name.into()));
    }

    pub fn clear_modal(&self) {
        self.active.set(None);
    }

    pub fn active_modal(&self) -> Option<String> {
        self.active.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.active.subscribe()
    }

    /// Observable flag that is true while `name` is the active modal.
    pub fn is_modal_active(&self, name: impl Into<String>) -> ModalFlag {
        ModalFlag {
            name: name.into(),
            rx: self.active.subscribe(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModalFlag {
    name: String,
    rx: watch::Receiver<Option<String>>,
}

impl ModalFlag {
    pub fn get(&self) -> bool {
        self.rx.borrow().as_deref() == Some(self.name.as_str())
    }

    /// Wait for the modal state to change, then report the flag.
    pub async fn changed(&mut self) -> Result<bool, watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(self.get())
    }
}
