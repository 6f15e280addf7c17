use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::controller::{AnimationController, SpinRequest, TickOutcome};
use crate::error::Result;
use crate::persistence::{Clock, KeyValueMedium, PersistenceStore};
use crate::wheel::{format_entries, parse_entries};

/// Ties the controller to the entry-list input and the persistence store.
///
/// The store is read once, in [`load_saved`](Self::load_saved), and written on
/// every entry-list change. Everything else works from the cached copy.
pub struct WheelApp<M: KeyValueMedium, C: Clock, R: Rng> {
    controller: AnimationController<R>,
    store: PersistenceStore<M, C>,
    saved_at: Option<i64>,
}

impl<M: KeyValueMedium, C: Clock, R: Rng> WheelApp<M, C, R> {
    pub fn new(controller: AnimationController<R>, store: PersistenceStore<M, C>) -> Self {
        Self {
            controller,
            store,
            saved_at: None,
        }
    }

    /// Restores the remembered entries, if any are still fresh.
    pub fn load_saved(&mut self) -> bool {
        let Some(record) = self.store.load_record() else {
            return false;
        };
        if record.entries.is_empty() {
            return false;
        }
        self.saved_at = Some(record.saved_at_timestamp);
        self.controller.set_entries(record.entries);
        true
    }

    /// Applies raw editor text and remembers the resulting list.
    pub fn edit_entries(&mut self, raw: &str) -> bool {
        self.set_entries(parse_entries(raw))
    }

    pub fn set_entries(&mut self, entries: Vec<String>) -> bool {
        match self.store.save(&entries) {
            Ok(saved_at) => self.saved_at = Some(saved_at),
            Err(err) => warn!(error = %err, "could not remember entry list"),
        }
        self.controller.set_entries(entries)
    }

    pub fn raw_entries(&self) -> String {
        format_entries(self.controller.wheel().entries())
    }

    pub fn request_spin(&mut self) -> Result<SpinRequest> {
        self.controller.request_spin()
    }

    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        self.controller.tick(dt)
    }

    pub fn forget(&mut self) -> Result<()> {
        self.store.clear()?;
        self.saved_at = None;
        Ok(())
    }

    /// When the current list was last written to the store, if it was.
    pub fn saved_at(&self) -> Option<i64> {
        self.saved_at
    }

    pub fn controller(&self) -> &AnimationController<R> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AnimationController<R> {
        &mut self.controller
    }

    pub fn store(&self) -> &PersistenceStore<M, C> {
        &self.store
    }
}
