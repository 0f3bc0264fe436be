use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::error::{ComparatorError, Result};
use crate::llm::CompletionGateway;
use crate::paths;

/// Per-process, read-only state shared by every invocation.
///
/// The data directory and the parsed catalog are resolved on first use and
/// then memoized; both derive from files that never change within a deployment.
pub struct AppContext {
    settings: Settings,
    gateway: Box<dyn CompletionGateway>,
    data_dir: OnceCell<PathBuf>,
    catalog: OnceCell<Arc<Catalog>>,
}

impl AppContext {
    pub fn new(settings: Settings, gateway: Box<dyn CompletionGateway>) -> Self {
        Self {
            settings,
            gateway,
            data_dir: OnceCell::new(),
            catalog: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn gateway(&self) -> &dyn CompletionGateway {
        self.gateway.as_ref()
    }

    pub fn data_dir(&self) -> Result<&Path> {
        let dir = self.data_dir.get_or_try_init(|| {
            let candidates = paths::data_dir_candidates(self.settings.data_dir.as_deref());
            let resolved = paths::resolve_data_dir(&candidates)?;
            info!(data_dir = %resolved.display(), "resolved data directory");
            Ok::<_, ComparatorError>(resolved)
        })?;
        Ok(dir.as_path())
    }

    pub fn catalog(&self) -> Result<Arc<Catalog>> {
        if !self.settings.cache_catalog {
            return self.load_catalog().map(Arc::new);
        }
        self.catalog
            .get_or_try_init(|| self.load_catalog().map(Arc::new))
            .cloned()
    }

    fn load_catalog(&self) -> Result<Catalog> {
        let path = self.data_dir()?.join(&self.settings.catalog_file);
        let catalog = Catalog::load(&path)?;
        info!(path = %path.display(), records = catalog.len(), "loaded catalog");
        Ok(catalog)
    }
}
