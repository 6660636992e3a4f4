use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use socialpulse::config::Config;
use socialpulse::filter::{DateRangeFilter, DateWindow};
use socialpulse::ingest;
use socialpulse::view::{View, ViewRouter};

/// Social media analytics dashboard pipeline.
#[derive(Parser)]
#[command(name = "socialpulse", about)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Logging verbosity level (trace, debug, info, warn, error).
    /// Overrides `log_level` from the config file.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one dashboard view as JSON on stdout.
    Render {
        /// Path to the JSON dataset.
        #[arg(short, long)]
        data: PathBuf,

        /// View to render (overview, engagement, content, audience).
        /// Defaults to `views.initial` from the config.
        #[arg(long, value_parser = parse_view)]
        view: Option<View>,

        /// First day of the window (YYYY-MM-DD, UTC).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the window (YYYY-MM-DD, UTC), inclusive.
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Print version information and exit.
    Version,
}

fn parse_view(name: &str) -> Result<View, String> {
    View::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = View::all().iter().map(|v| v.as_str()).collect();
        format!("unknown view {name:?} (expected one of: {})", known.join(", "))
    })
}

/// Build-time version info.
mod version {
    /// Release version string (set at build time).
    pub const RELEASE: &str = env!("CARGO_PKG_VERSION");

    /// Git commit hash (set at build time via env, or "unknown").
    pub fn git_commit() -> &'static str {
        option_env!("GIT_COMMIT").unwrap_or("unknown")
    }

    /// Full version string with platform info.
    pub fn full() -> String {
        format!(
            "{} (commit: {}, {}/{})",
            RELEASE,
            git_commit(),
            std::env::consts::OS,
            std::env::consts::ARCH,
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (data, view, start, end) = match cli.command {
        Command::Version => {
            println!("socialpulse {}", version::full());
            return Ok(());
        }
        Command::Render {
            data,
            view,
            start,
            end,
        } => (data, view, start, end),
    };

    let cfg = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    // Logs go to stderr so stdout carries only the payload.
    let level = cli.log_level.as_deref().unwrap_or(&cfg.log_level);
    let filter =
        EnvFilter::try_new(level).with_context(|| format!("invalid log level: {level}"))?;
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        version = version::RELEASE,
        commit = version::git_commit(),
        "starting socialpulse",
    );

    let store = ingest::load_dataset(&data)?;

    let filter = DateRangeFilter::new(Utc::now(), cfg.window.lookback()?);
    let mut router = ViewRouter::new(
        &store,
        filter,
        cfg.views.initial,
        cfg.views.render_settings(),
    );

    match (start, end) {
        (Some(start), Some(end)) => {
            let window = DateWindow::from_days(start, end)?;
            router.update_window(window.start(), window.end())?;
        }
        (None, None) => {}
        _ => bail!("--start and --end must be given together"),
    }

    if let Some(view) = view {
        router.navigate_to(view);
    }

    let payload = router.render();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &payload).context("writing payload")?;
    writeln!(out).context("writing payload")?;

    Ok(())
}
