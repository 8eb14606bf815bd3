use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow, bail, ensure};
use config::{Config, ConfigError, File};
use serde::Deserialize;
use url::Url;

use receptar_cms::BackendConfig;
use receptar_tui::UiLabels;

use crate::app_dirs;
use crate::cli::CliArgs;

const DEFAULT_COLLECTION: &str = "recepteks";
const DEFAULT_RESULTS_PATH: &str = "/search";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_SUGGESTION_LIMIT: usize = 5;
const DEFAULT_BOOTSTRAP_LIMIT: usize = 1000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    backend: BackendSection,
    search: SearchSection,
    ui: UiSection,
    engagement: EngagementSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct BackendSection {
    url: Option<String>,
    collection: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
    bootstrap_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SearchSection {
    debounce_ms: Option<u64>,
    limit: Option<usize>,
    initial_query: Option<String>,
    results_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct UiSection {
    prompt_title: Option<String>,
    placeholder: Option<String>,
    hint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct EngagementSection {
    count_views: Option<bool>,
}

/// Fully validated configuration consumed by the workflow.
pub(crate) struct ResolvedConfig {
    pub backend: Option<BackendConfig>,
    pub bootstrap_limit: usize,
    pub debounce: Duration,
    pub limit: usize,
    pub initial_query: String,
    pub results_path: String,
    pub labels: UiLabels,
    pub count_views: bool,
    pub rate: Option<u8>,
}

impl ResolvedConfig {
    pub fn print_summary(&self) {
        println!("Effective configuration:");
        match &self.backend {
            Some(_) => println!("  Backend: configured"),
            None => println!("  Backend: (none; suggestions run without a remote source)"),
        }
        println!("  Suggestion limit: {}", self.limit);
        println!("  Debounce: {} ms", self.debounce.as_millis());
        println!("  Bootstrap limit: {}", self.bootstrap_limit);
        println!("  Results path: {}", self.results_path);
        println!(
            "  Count views: {}",
            if self.count_views { "yes" } else { "no" }
        );
        if let Some(rate) = self.rate {
            println!("  Rate on selection: {rate}");
        }
        if !self.initial_query.is_empty() {
            println!("  Initial query: {}", self.initial_query);
        }
        println!("  Prompt title: {}", self.labels.prompt_title);
    }
}

pub(crate) fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
    let builder = build_config(cli)?;
    let mut raw: RawConfig = builder
        .try_deserialize()
        .map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
    raw.apply_cli_overrides(cli);
    raw.resolve(cli)
}

fn build_config(cli: &CliArgs) -> Result<Config> {
    let mut builder = Config::builder();

    if !cli.no_config {
        for path in default_config_files() {
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    for path in &cli.config {
        builder = builder.add_source(File::from(path.clone()).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("receptar")
            .separator("__")
            .try_parsing(true)
            .list_separator(","),
    );

    builder.build().map_err(|err| match err {
        ConfigError::Frozen => anyhow!("configuration builder is frozen"),
        other => other.into(),
    })
}

fn default_config_files() -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Ok(dir) = app_dirs::get_config_dir() {
        files.push(dir.join("config.toml"));
    }

    if let Ok(current_dir) = env::current_dir() {
        files.push(current_dir.join(".receptar.toml"));
        files.push(current_dir.join("receptar.toml"));
    }

    files
}

impl RawConfig {
    fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(url) = cli.backend_url.clone() {
            self.backend.url = Some(url);
        }
        if let Some(collection) = cli.collection.clone() {
            self.backend.collection = Some(collection);
        }
        if let Some(token) = cli.token.clone() {
            self.backend.token = Some(token);
        }
        if let Some(limit) = cli.limit {
            self.search.limit = Some(limit);
        }
        if let Some(debounce) = cli.debounce_ms {
            self.search.debounce_ms = Some(debounce);
        }
        if let Some(query) = cli.initial_query.clone() {
            self.search.initial_query = Some(query);
        }
        if let Some(title) = cli.title.clone() {
            self.ui.prompt_title = Some(title);
        }
        if cli.no_view_count {
            self.engagement.count_views = Some(false);
        }
    }

    fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig> {
        let backend = match self.backend.url {
            Some(raw_url) if !raw_url.trim().is_empty() => {
                let parsed = Url::parse(raw_url.trim())
                    .map_err(|err| anyhow!("invalid backend URL '{raw_url}': {err}"))?;
                match parsed.scheme() {
                    "http" | "https" => {}
                    other => bail!("backend URL must be http(s), got '{other}'"),
                }
                let collection = self
                    .backend
                    .collection
                    .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
                let mut config = BackendConfig::new(raw_url.trim(), collection)
                    .with_token(self.backend.token);
                if let Some(secs) = self.backend.timeout_secs {
                    ensure!(secs > 0, "backend timeout must be positive");
                    config = config.with_timeout(Duration::from_secs(secs));
                }
                Some(config)
            }
            _ => None,
        };

        let limit = self.search.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
        ensure!(limit > 0, "suggestion limit must be at least 1");

        let bootstrap_limit = self
            .backend
            .bootstrap_limit
            .unwrap_or(DEFAULT_BOOTSTRAP_LIMIT);
        ensure!(bootstrap_limit > 0, "bootstrap limit must be at least 1");

        let debounce =
            Duration::from_millis(self.search.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS));

        let results_path = self
            .search
            .results_path
            .unwrap_or_else(|| DEFAULT_RESULTS_PATH.to_string());

        let mut labels = UiLabels::default();
        if let Some(title) = self.ui.prompt_title {
            labels.prompt_title = title;
        }
        if let Some(placeholder) = self.ui.placeholder {
            labels.placeholder = placeholder;
        }
        if let Some(hint) = self.ui.hint {
            labels.hint = hint;
        }

        Ok(ResolvedConfig {
            backend,
            bootstrap_limit,
            debounce,
            limit,
            initial_query: self.search.initial_query.unwrap_or_default(),
            results_path,
            labels,
            count_views: self.engagement.count_views.unwrap_or(true),
            rate: cli.rate,
        })
    }
}
