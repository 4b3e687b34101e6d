//! Keyboard routing for open dialogs.
//!
//! One `KeyDispatcher` is shared by every dialog. Opening a dialog acquires a
//! `ModalScope`; dropping the scope releases it, whichever way the dialog was
//! left. Escape is delivered to the most recently opened scope only.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Char(char),
}

#[derive(Debug, Clone, Default)]
pub struct KeyDispatcher {
    inner: Arc<Mutex<Scopes>>,
}

#[derive(Debug, Default)]
struct Scopes {
    next_id: u64,
    stack: Vec<ScopeSlot>,
}

#[derive(Debug)]
struct ScopeSlot {
    id: u64,
    name: &'static str,
    escape_requested: Arc<AtomicBool>,
}

impl KeyDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, name: &'static str) -> ModalScope {
        let escape_requested = Arc::new(AtomicBool::new(false));
        let mut scopes = self.lock();
        let id = scopes.next_id;
        scopes.next_id += 1;
        scopes.stack.push(ScopeSlot {
            id,
            name,
            escape_requested: Arc::clone(&escape_requested),
        });
        debug!(name, id, "modal scope acquired");

        ModalScope {
            id,
            dispatcher: self.clone(),
            escape_requested,
        }
    }

    /// Routes `key` to the innermost scope. Returns whether anything was
    /// listening for it.
    pub fn dispatch(&self, key: Key) -> bool {
        let scopes = self.lock();
        match (key, scopes.stack.last()) {
            (Key::Escape, Some(top)) => {
                debug!(name = top.name, "escape delivered");
                top.escape_requested.store(true, Ordering::SeqCst);
                true
            }
            _ => false,
        }
    }

    pub fn open_scopes(&self) -> usize {
        self.lock().stack.len()
    }

    fn release(&self, id: u64) {
        let mut scopes = self.lock();
        scopes.stack.retain(|slot| slot.id != id);
        debug!(id, "modal scope released");
    }

    fn lock(&self) -> MutexGuard<'_, Scopes> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held by an open dialog for as long as it listens for Escape.
#[derive(Debug)]
pub struct ModalScope {
    id: u64,
    dispatcher: KeyDispatcher,
    escape_requested: Arc<AtomicBool>,
}

impl ModalScope {
    /// True once per Escape delivered to this scope.
    pub fn take_escape(&self) -> bool {
        self.escape_requested.swap(false, Ordering::SeqCst)
    }
}

impl Drop for ModalScope {
    fn drop(&mut self) {
        self.dispatcher.release(self.id);
    }
}


use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
