// # ipboard - IP-address table client
//
// This is a THIN integration layer ONLY.
// - DO NOT add table, pagination, or editing logic here
// - All table logic MUST be in ipboard-core
// - Configuration is via environment variables ONLY
//
// The ipboard binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing the runtime and tracing
// 3. Wiring the credential store, session, HTTP API and table engine
// 4. Driving page navigation from stdin and rendering store snapshots
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `IPBOARD_API_URL`: Base URL of the record service (required)
// - `IPBOARD_CREDENTIALS_PATH`: Path to the credential file
//   (default: ipboard_credentials.json)
// - `IPBOARD_ITEMS_PER_PAGE`: Records per page (default: 10, max: 50)
// - `IPBOARD_USER_ID`: Numeric id of the session user (default: 0)
// - `IPBOARD_USERNAME`: Username of the session user (default: viewer)
// - `IPBOARD_SUPERUSER`: "true" to grant superuser capabilities
// - `IPBOARD_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export IPBOARD_API_URL=https://ipboard.example.com/api
// export IPBOARD_CREDENTIALS_PATH=~/.config/ipboard/credentials.json
// export IPBOARD_USERNAME=alice
// export IPBOARD_USER_ID=1
//
// ipboard
// ```
//
// Commands at the prompt: `n` next page, `p` previous page, a page number
// to jump, `r` re-render, `q` quit.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use ipboard_core::{
    FileCredentialStore, MemorySession, PageState, PaginationView, TableConfig, TableEngine,
    TableEvent, UserRef,
};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum IpboardExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<IpboardExitCode> for ExitCode {
    fn from(code: IpboardExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    api_url: String,
    credentials_path: String,
    items_per_page: Option<u32>,
    user_id: i64,
    username: String,
    superuser: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: env::var("IPBOARD_API_URL").map_err(|_| {
                anyhow::anyhow!(
                    "IPBOARD_API_URL is required. \
                    Set it via: export IPBOARD_API_URL=https://ipboard.example.com/api"
                )
            })?,
            credentials_path: env::var("IPBOARD_CREDENTIALS_PATH")
                .unwrap_or_else(|_| "ipboard_credentials.json".to_string()),
            items_per_page: env::var("IPBOARD_ITEMS_PER_PAGE")
                .ok()
                .map(|s| {
                    s.parse().map_err(|_| {
                        anyhow::anyhow!("IPBOARD_ITEMS_PER_PAGE must be a number, got '{}'", s)
                    })
                })
                .transpose()?,
            user_id: env::var("IPBOARD_USER_ID")
                .ok()
                .map(|s| {
                    s.parse().map_err(|_| {
                        anyhow::anyhow!("IPBOARD_USER_ID must be a number, got '{}'", s)
                    })
                })
                .transpose()?
                .unwrap_or(0),
            username: env::var("IPBOARD_USERNAME").unwrap_or_else(|_| "viewer".to_string()),
            superuser: env::var("IPBOARD_SUPERUSER")
                .map(|s| s.eq_ignore_ascii_case("true") || s == "1")
                .unwrap_or(false),
            log_level: env::var("IPBOARD_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("https://") && !self.api_url.starts_with("http://") {
            anyhow::bail!(
                "IPBOARD_API_URL must use HTTP or HTTPS scheme. Got: {}",
                self.api_url
            );
        }

        if self.api_url.starts_with("http://") {
            eprintln!(
                "WARNING: IPBOARD_API_URL uses HTTP (not HTTPS). \
                Tokens will travel in the clear. Consider using HTTPS."
            );
        }

        if self.credentials_path.is_empty() {
            anyhow::bail!("IPBOARD_CREDENTIALS_PATH cannot be empty");
        }

        if let Some(items) = self.items_per_page
            && !(1..=ipboard_core::MAX_ITEMS_PER_PAGE).contains(&items)
        {
            anyhow::bail!(
                "IPBOARD_ITEMS_PER_PAGE must be between 1 and {}. Got: {}",
                ipboard_core::MAX_ITEMS_PER_PAGE,
                items
            );
        }

        if self.username.is_empty() {
            anyhow::bail!("IPBOARD_USERNAME cannot be empty");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "IPBOARD_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn user(&self) -> UserRef {
        UserRef {
            id: self.user_id,
            username: self.username.clone(),
            is_superuser: self.superuser,
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return IpboardExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return IpboardExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return IpboardExitCode::ConfigError.into();
    }

    info!("Starting ipboard");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return IpboardExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(config).await {
            error!("Client error: {}", e);
            IpboardExitCode::RuntimeError
        } else {
            IpboardExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire the components and drive the interactive loop
async fn run(config: Config) -> Result<()> {
    let credentials = Arc::new(FileCredentialStore::new(&config.credentials_path).await?);
    let session = Arc::new(MemorySession::new(config.user(), credentials.clone()));
    let api = Arc::new(ipboard_api_http::HttpRecordApi::new(
        &config.api_url,
        credentials,
    )?);

    let table_config = TableConfig {
        items_per_page: config.items_per_page.unwrap_or_else(|| TableConfig::default().items_per_page),
        ..TableConfig::default()
    };

    let (engine, mut events) = TableEngine::new(api, session, table_config)?;

    info!(
        user = %engine.current_user().username,
        url = %config.api_url,
        "Table engine wired"
    );

    // Log events as they arrive; the stores remain the source of truth.
    let event_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                TableEvent::ScrollToAnchor => {}
                TableEvent::PageLoaded { page_number, count } => {
                    info!(page_number, count, "Page loaded");
                }
                TableEvent::SessionInvalidated => {
                    error!("Session invalidated: credentials cleared, please log in again");
                }
                TableEvent::RowEdited { id } => info!(id, "Record edited"),
                TableEvent::RowDeleted { id } => info!(id, "Record deleted"),
            }
        }
    });

    engine.pages().request_page(0).await;
    render(
        &engine.store().snapshot().await,
        &engine.pages().pagination().await,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Commands: n(ext), p(rev), <page number>, r(edraw), q(uit)");

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "q" => break,
            "n" => engine.pages().next_page().await,
            "p" => engine.pages().prev_page().await,
            "r" => {}
            // Pages are shown 1-based; the core counts from 0.
            other => match other.parse::<u32>() {
                Ok(page) if page > 0 => engine.pages().request_page(page - 1).await,
                Ok(_) => {
                    warn!("Page numbers start at 1");
                    continue;
                }
                Err(_) => {
                    warn!("Unknown command: {}", other);
                    continue;
                }
            },
        }

        render(
            &engine.store().snapshot().await,
            &engine.pages().pagination().await,
        );
    }

    event_task.abort();
    info!("Shutting down");
    Ok(())
}

/// Print the current page and pagination line
fn render(state: &PageState, view: &PaginationView) {
    println!();
    println!(
        "{:>6}  {:<15}  {:<20}  {:<12}  {}",
        "id", "ip address", "label", "recorder", "comment"
    );
    for record in &state.ips {
        println!(
            "{:>6}  {:<15}  {:<20}  {:<12}  {}",
            record.id, record.ip_address, record.label, record.recorder.username, record.comment
        );
    }
    if state.ips.is_empty() {
        println!("  (no records)");
    }

    let prev = if view.prev_visible { "<prev" } else { "     " };
    let next = if view.next_visible { "next>" } else { "     " };
    println!(
        "{} page {}/{} ({} records) {}{}",
        prev,
        view.page_number + 1,
        view.page_count.max(1),
        state.num_total_items,
        next,
        if view.buttons_enabled { "" } else { "  [loading]" }
    );
}
