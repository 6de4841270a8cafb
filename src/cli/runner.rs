//! CLI runner - executes commands

use crate::cli::commands::{parse_steps, Cli, Commands, OutputFormat, Step};
use crate::config::{PagerConfig, ResourceConfig};
use crate::engine::{PagedResource, ResourceState};
use crate::error::{Error, Result};
use crate::http::HttpPageFetcher;
use crate::loader::load_config;
use crate::pagination::format_pager;
use crate::types::parse_key_value;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

/// What `browse` prints after each step
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    /// Step that produced this view
    pub step: String,
    /// Current page
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Total pages, 0 when unknown
    pub total_pages: u32,
    /// Total items
    pub total_items: u64,
    /// Items on the current page
    pub items: Vec<Value>,
    /// Error of the current page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Extra data from the last successful fetch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
    /// Plain-text pager
    pub pager: String,
}

impl PageView {
    /// Capture the current page of a snapshot
    pub fn capture(
        step: impl Into<String>,
        state: &ResourceState<HttpPageFetcher>,
        pager: &PagerConfig,
    ) -> Self {
        Self {
            step: step.into(),
            page: state.current_page(),
            per_page: state.per_page(),
            total_pages: state.total_pages(),
            total_items: state.total_items(),
            items: state.current_items().to_vec(),
            error: state.current_error().map(ToString::to_string),
            extra: state.extra_data().cloned(),
            pager: format_pager(&state.sections(pager.end_count, pager.middle_count)),
        }
    }
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Browse { steps, params } => self.browse(steps, params).await,
            Commands::Pager {
                total_pages,
                current,
                end_count,
                middle_count,
            } => self.pager(*total_pages, *current, *end_count, *middle_count),
            Commands::Validate => self.validate(),
        }
    }

    /// Load resource configuration
    fn load_config(&self) -> Result<ResourceConfig> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config file not specified (use -c flag)"))?;
        load_config(path)
    }

    /// Open the resource and replay steps, printing the page after each
    async fn browse(&self, steps: &str, params: &[String]) -> Result<()> {
        let config = self.load_config()?;
        let steps = parse_steps(steps)?;

        let mut context = config.request_context.clone();
        for param in params {
            let (key, value) = parse_key_value(param)
                .ok_or_else(|| Error::config(format!("Invalid parameter '{param}', expected key=value")))?;
            context.insert(key, value);
        }

        let fetcher = HttpPageFetcher::from_config(&config.source)?;
        let limit = settle_limit(config.source.timeout_secs);
        let mut resource = PagedResource::new(
            fetcher,
            context.clone(),
            config.start_page,
            config.per_page,
        );
        settle(&mut resource, limit).await?;
        self.emit(&PageView::capture("open", resource.state(), &config.pager))?;

        for step in steps {
            let label = match &step {
                Step::Next => {
                    resource.move_next();
                    "next".to_string()
                }
                Step::Previous => {
                    resource.move_previous();
                    "prev".to_string()
                }
                Step::Jump(page) => {
                    resource.jump_to(*page);
                    format!("jump:{page}")
                }
                Step::PerPage(per_page) => {
                    resource.update_items_per_page(*per_page);
                    format!("per-page:{per_page}")
                }
                Step::Param(key, value) => {
                    context.insert(key.clone(), value.clone());
                    resource.update_request_context(context.clone());
                    format!("param:{key}={value}")
                }
                Step::Unparam(key) => {
                    context.remove(key);
                    resource.update_request_context(context.clone());
                    format!("unparam:{key}")
                }
            };
            settle(&mut resource, limit).await?;
            self.emit(&PageView::capture(label, resource.state(), &config.pager))?;
        }

        let stats = resource.stats();
        info!(
            fetches = stats.fetches_issued,
            failures = stats.failures,
            corrective_jumps = stats.corrective_jumps,
            "browse finished"
        );
        Ok(())
    }

    /// Print pager sections
    fn pager(
        &self,
        total_pages: u32,
        current: u32,
        end_count: Option<u32>,
        middle_count: Option<u32>,
    ) -> Result<()> {
        let defaults = match &self.cli.config {
            Some(path) => load_config(path)?.pager,
            None => PagerConfig::default(),
        };
        let pager = PagerConfig {
            end_count: end_count.unwrap_or(defaults.end_count),
            middle_count: middle_count.unwrap_or(defaults.middle_count),
        };
        let sections = pager.sections(total_pages, current);

        match self.cli.format {
            OutputFormat::Json => println!("{}", json!({ "sections": sections })),
            OutputFormat::Pretty => println!("{}", format_pager(&sections)),
        }
        Ok(())
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&config)?),
            OutputFormat::Pretty => println!(
                "Config OK: {}{} ({} per page, starting at page {})",
                config.source.base_url.trim_end_matches('/'),
                config.source.path,
                config.per_page,
                config.start_page
            ),
        }
        Ok(())
    }

    fn emit(&self, view: &PageView) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(view)?),
            OutputFormat::Pretty => println!("{}", render_view(view)),
        }
        Ok(())
    }
}

/// Time allowed for one step to settle: a corrective jump can add a second
/// round of requests after the first.
fn settle_limit(request_timeout_secs: u64) -> Duration {
    Duration::from_secs(request_timeout_secs.saturating_mul(3))
}

async fn settle(resource: &mut PagedResource<HttpPageFetcher>, limit: Duration) -> Result<()> {
    tokio::time::timeout(limit, resource.settle())
        .await
        .map_err(|_| Error::Timeout {
            timeout_ms: limit.as_millis() as u64,
        })?
}

/// Human-readable rendering of a page view
pub fn render_view(view: &PageView) -> String {
    let mut lines = vec![format!(
        "== {} → page {}/{} ({} items, {} per page)",
        view.step, view.page, view.total_pages, view.total_items, view.per_page
    )];

    if let Some(error) = &view.error {
        lines.push(format!("   error: {error}"));
    } else if view.items.is_empty() {
        lines.push("   (no items)".to_string());
    } else {
        lines.extend(view.items.iter().map(|item| format!("   {item}")));
    }
    if !view.pager.is_empty() {
        lines.push(format!("   pages: {}", view.pager));
    }
    lines.join("\n")
}
