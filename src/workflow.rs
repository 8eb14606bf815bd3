use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, warn};

use receptar_cms::{CmsClient, spawn_fetch_worker, spawn_index_bootstrap};
use receptar_suggest::QueryController;
use receptar_tui::App;

use crate::settings::ResolvedConfig;

/// What the session produced, ready for printing.
pub(crate) struct SessionReport {
    pub accepted: bool,
    pub query: String,
    pub url: Option<String>,
    pub slug: Option<String>,
    pub views: Option<u64>,
}

/// Coordinates wiring the workers, running the interactive session, and the
/// follow-up engagement writes.
pub(crate) struct SearchWorkflow {
    app: App,
    client: Option<CmsClient>,
    results_path: String,
    count_views: bool,
    rate: Option<u8>,
}

impl SearchWorkflow {
    pub(crate) fn from_config(config: ResolvedConfig) -> Result<Self> {
        let client = match config.backend.clone() {
            Some(backend) => Some(
                CmsClient::new(backend).context("failed to construct the CMS client")?,
            ),
            None => {
                error!("no backend base URL configured; suggestions run without a remote source");
                None
            }
        };

        let (remote, resolutions, index_updates) = match client.clone() {
            Some(client) => {
                let (request_tx, resolution_rx) = spawn_fetch_worker(client.clone());
                let index_rx = spawn_index_bootstrap(client, config.bootstrap_limit);
                (Some(request_tx), Some(resolution_rx), Some(index_rx))
            }
            None => (None, None, None),
        };

        let mut controller = QueryController::new(remote)
            .with_debounce(config.debounce)
            .with_limit(config.limit);
        if !config.initial_query.trim().is_empty() {
            controller.set_text(config.initial_query.clone(), Instant::now());
        }

        let app = App::new(controller, resolutions, index_updates).with_labels(config.labels);

        Ok(Self {
            app,
            client,
            results_path: config.results_path,
            count_views: config.count_views,
            rate: config.rate,
        })
    }

    pub(crate) fn run(mut self) -> Result<SessionReport> {
        let outcome = self.app.run()?;

        let mut report = SessionReport {
            accepted: outcome.accepted,
            query: outcome.query,
            url: outcome
                .navigation
                .as_ref()
                .map(|navigation| navigation.results_url(&self.results_path)),
            slug: outcome
                .navigation
                .as_ref()
                .and_then(|navigation| navigation.slug().map(str::to_string)),
            views: None,
        };

        if report.accepted {
            report.views = self.record_engagement(report.slug.as_deref());
        }

        Ok(report)
    }

    /// Mirror the website: opening a recipe bumps its view counter, and an
    /// optional rating follows. Failures are logged, never fatal.
    fn record_engagement(&self, slug: Option<&str>) -> Option<u64> {
        let client = self.client.as_ref()?;
        let slug = slug?;

        let views = if self.count_views {
            match client.bump_views(slug) {
                Ok(views) => Some(views),
                Err(err) => {
                    warn!(error = %err, slug, "view-counter update failed");
                    None
                }
            }
        } else {
            None
        };

        if let Some(rating) = self.rate
            && let Err(err) = client.submit_rating(slug, rating)
        {
            warn!(error = %err, slug, rating, "rating submission failed");
        }

        views
    }
}
