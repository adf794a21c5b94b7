//! Scoped ownership of the service-side vector database registry
//!
//! A test or job that needs a known registry state acquires it with
//! [`with_clean_registry`]: the registry is emptied, the body runs with a
//! [`RegistryScope`] that records what it registers, and the scope is released
//! afterwards whether the body succeeded or not.

use crate::sdk::config::RegistrationDefaults;
use crate::sdk::errors::{RagError, Result};
use crate::sdk::service::RagService;
use crate::sdk::types::{VectorDb, VectorDbRegistration};
use futures::FutureExt;
use rand::Rng;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Unregister every vector database the service knows about
///
/// Returns the identifiers that were removed.
pub async fn clear_registry<S>(service: &S) -> Result<Vec<String>>
where
    S: RagService + ?Sized,
{
    let ids: Vec<String> = service
        .list_vector_dbs()
        .await?
        .into_iter()
        .map(|db| db.identifier)
        .collect();

    for id in &ids {
        service.unregister_vector_db(id).await?;
    }

    if !ids.is_empty() {
        info!("Cleared {} vector dbs from registry", ids.len());
    }
    Ok(ids)
}

/// `{prefix}_{n}` with a four digit `n`
pub fn random_vector_db_id(prefix: &str) -> String {
    let n: u32 = rand::thread_rng().gen_range(1000..=9999);
    format!("{}_{}", prefix, n)
}

/// Vector databases registered during one scope
#[derive(Debug, Clone, Default)]
pub struct RegistryScope {
    registered: Arc<Mutex<Vec<String>>>,
}

impl RegistryScope {
    /// Empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Register through the scope so the database is removed on release
    pub async fn register<S>(
        &self,
        service: &S,
        registration: &VectorDbRegistration,
    ) -> Result<VectorDb>
    where
        S: RagService + ?Sized,
    {
        let db = service.register_vector_db(registration).await?;
        self.track(&registration.vector_db_id).await;
        Ok(db)
    }

    /// Register a database with a random `{prefix}_NNNN` identifier
    pub async fn register_random<S>(
        &self,
        service: &S,
        prefix: &str,
        defaults: &RegistrationDefaults,
    ) -> Result<VectorDb>
    where
        S: RagService + ?Sized,
    {
        let registration = VectorDbRegistration::with_defaults(random_vector_db_id(prefix), defaults);
        self.register(service, &registration).await
    }

    /// Record a database registered elsewhere
    pub async fn track(&self, vector_db_id: &str) {
        let mut registered = self.registered.lock().await;
        if !registered.iter().any(|id| id == vector_db_id) {
            registered.push(vector_db_id.to_string());
        }
    }

    /// Identifiers recorded so far, in registration order
    pub async fn registered_ids(&self) -> Vec<String> {
        self.registered.lock().await.clone()
    }

    /// Unregister everything recorded
    ///
    /// Databases the body already removed are skipped. Every id is attempted;
    /// the first other failure is returned.
    pub async fn release<S>(&self, service: &S) -> Result<()>
    where
        S: RagService + ?Sized,
    {
        let ids: Vec<String> = std::mem::take(&mut *self.registered.lock().await);
        let mut first_error: Option<RagError> = None;

        for id in ids {
            match service.unregister_vector_db(&id).await {
                Ok(()) => debug!("Released vector db {}", id),
                Err(RagError::NotFound(_)) => debug!("Vector db {} already gone", id),
                Err(e) => {
                    warn!("Failed to release vector db {}: {}", id, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Run `body` against an emptied registry and clean up after it
///
/// An error from `body` takes precedence over a cleanup error. A panic in
/// `body` is resumed after the scope has been released.
pub async fn with_clean_registry<S, F, Fut, T>(service: &S, body: F) -> Result<T>
where
    S: RagService + ?Sized,
    F: FnOnce(RegistryScope) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    clear_registry(service).await?;

    let scope = RegistryScope::new();
    let outcome = match AssertUnwindSafe(body(scope.clone())).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(panic) => {
            if let Err(e) = scope.release(service).await {
                warn!("Cleanup after panicking scope failed: {}", e);
            }
            std::panic::resume_unwind(panic);
        }
    };
    let cleanup = scope.release(service).await;

    match (outcome, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup_error)) => {
            warn!("Cleanup after failed scope also failed: {}", cleanup_error);
            Err(e)
        }
    }
}
