use std::sync::Arc;

use crate::db::Database;
use crate::transfer::TransferEngine;

/// Shared gateway state.
///
/// The pool handle and the engine are the only process-wide resources;
/// both are injected at startup, nothing is global.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub engine: Arc<TransferEngine>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let engine = Arc::new(TransferEngine::new(db.clone()));
        Self { db, engine }
    }
}
