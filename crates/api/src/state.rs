//! Shared request state

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pgtracker_core::{Database, EmailSender};

/// State handed to every handler.
///
/// The store handle is owned by the process entry point and injected
/// here; the room row is the unit of atomicity, so serializing access
/// through the mutex is what makes read-modify-append updates safe.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
    pub mailer: Arc<dyn EmailSender>,
}

impl AppState {
    pub fn new(db: Database, mailer: Arc<dyn EmailSender>) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            mailer,
        }
    }

    /// Lock the store for one logical operation.
    ///
    /// A poisoned lock is recovered rather than propagated: the store
    /// itself cannot be left half-written by a panicking handler, since
    /// every mutation is a single document update.
    pub fn db(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
