// src/state.rs

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::catalog::Catalog;
use crate::persistence;
use crate::services::SubmissionSink;
use crate::store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub catalog: &'static Catalog,
    pub store: Arc<RwLock<SessionStore>>,
    pub store_file: Arc<PathBuf>,
    pub submission_sink: Arc<dyn SubmissionSink>,
}

impl AppState {
    /// Dostęp do rekordu sesji do odczytu. Zatrucie locka ignorujemy -
    /// rekord nie ma niezmienników, które panika mogłaby zostawić w pół kroku.
    pub fn read_store(&self) -> RwLockReadGuard<'_, SessionStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write_store(&self) -> RwLockWriteGuard<'_, SessionStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Migawka rekordu poza lockiem, potem zapis best-effort. Wołane po
    /// każdej operacji mutującej.
    pub async fn persist(&self) {
        let snapshot = self.read_store().clone();
        persistence::persist_store(&self.store_file, &snapshot).await;
    }
}
