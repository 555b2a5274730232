use benefit_screener::screening::{BenefitCatalog, CatalogError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Arc<CatalogStore>,
}

impl AppState {
    pub(crate) fn is_ready(&self) -> bool {
        self.readiness.load(Ordering::Relaxed) && self.catalog.snapshot().is_some()
    }
}

/// Catalog shared across requests. Reloads swap the whole catalog; failures clear it.
#[derive(Debug)]
pub(crate) struct CatalogStore {
    path: PathBuf,
    current: RwLock<Option<BenefitCatalog>>,
}

impl CatalogStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            current: RwLock::new(None),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_catalog(path: PathBuf, catalog: BenefitCatalog) -> Self {
        Self {
            path,
            current: RwLock::new(Some(catalog)),
        }
    }

    pub(crate) fn path(&self) -> &PathBuf {
        &self.path
    }

    pub(crate) fn snapshot(&self) -> Option<BenefitCatalog> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn reload(&self) -> Result<BenefitCatalog, CatalogError> {
        let result = BenefitCatalog::from_path(&self.path);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match result {
            Ok(catalog) => {
                info!(path = %self.path.display(), records = catalog.len(), "catalog reloaded");
                *guard = Some(catalog.clone());
                Ok(catalog)
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "catalog reload failed");
                *guard = None;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn test_metrics_handle() -> Arc<PrometheusHandle> {
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    Arc::new(recorder.handle())
}
