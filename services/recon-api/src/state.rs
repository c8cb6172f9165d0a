//! Application state for the recon map service.

use std::sync::Arc;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use recon_common::{ReconResult, StormCatalog};
use recon_render::ColorSchemeSet;

use crate::config::ServiceConfig;
use crate::loader::{LoadOutcome, MarkerSync, Viewport};
use crate::orchestrator::{LoadRequest, Orchestrator};
use crate::source::{DataSource, FsSource, HttpSource};

/// Shared application state.
pub struct AppState {
    pub config: ServiceConfig,

    /// Active color schemes (built-ins plus overrides).
    pub schemes: Arc<ColorSchemeSet>,

    /// Catalog and dropdown selection.
    pub orchestrator: RwLock<Orchestrator>,

    /// Marker layer and load sequencing.
    pub markers: MarkerSync,

    /// Prometheus exporter, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state from configuration, choosing the data source it names.
    pub async fn new(config: ServiceConfig) -> Result<Self> {
        let source: Arc<dyn DataSource> = match &config.data_url {
            Some(url) => Arc::new(HttpSource::new(url)?),
            None => Arc::new(FsSource::new(&config.static_dir)),
        };

        let schemes = match &config.schemes_path {
            Some(path) => ColorSchemeSet::from_file(path)
                .with_context(|| format!("Failed to load color schemes: {:?}", path))?,
            None => ColorSchemeSet::builtin(),
        };

        Self::with_source(config, source, schemes).await
    }

    /// Build state around an existing source. Fails when the catalog can't be loaded.
    pub async fn with_source(
        config: ServiceConfig,
        source: Arc<dyn DataSource>,
        schemes: ColorSchemeSet,
    ) -> Result<Self> {
        info!(source = %source.describe(), catalog = %config.catalog_path, "Loading storm catalog");
        let document = source
            .fetch_json(&config.catalog_path)
            .await
            .context("Failed to load storm catalog")?;
        let catalog =
            StormCatalog::from_value(document).context("Failed to parse storm catalog")?;
        info!(storms = catalog.storms.len(), "Storm catalog loaded");

        let schemes = Arc::new(schemes);
        let markers = MarkerSync::new(
            source,
            Arc::clone(&schemes),
            Viewport {
                center: config.map.center,
                zoom: config.map.zoom,
            },
            config.map.marker_zoom,
        );

        Ok(Self {
            config,
            schemes,
            orchestrator: RwLock::new(Orchestrator::new(catalog)),
            markers,
            prometheus: None,
        })
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Run a load requested by the orchestrator.
    ///
    /// The stamp is reserved before the orchestrator lock is released by the
    /// caller, so the order of selection changes decides which load wins.
    pub async fn execute(&self, stamp: u64, request: &LoadRequest) -> ReconResult<LoadOutcome> {
        let outcome = self
            .markers
            .load_stamped(stamp, &request.path, request.mode, request.first_load)
            .await?;

        if let LoadOutcome::Applied {
            opened_popup: Some(_),
            ..
        } = outcome
        {
            self.orchestrator.write().await.mark_initial_load();
        }
        Ok(outcome)
    }

    /// Auto-select the configured default storm. Failures are logged only.
    pub async fn startup(&self) {
        let Some(storm) = self.config.default_storm.clone() else {
            return;
        };

        let (stamp, request) = {
            let mut orchestrator = self.orchestrator.write().await;
            match orchestrator.select_default(&storm) {
                Some(request) => (self.markers.issue_stamp(), request),
                None => return,
            }
        };

        info!(storm = %storm, path = %request.path, "Auto-loading default storm");
        match self.execute(stamp, &request).await {
            Ok(LoadOutcome::Stale { .. }) => warn!("Default storm load superseded"),
            Ok(_) => {}
            Err(e) => error!(error = %e, "Failed to load default storm"),
        }
    }
}
