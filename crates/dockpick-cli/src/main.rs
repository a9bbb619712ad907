//! dockpick - pick a running container and act on it

use clap::Parser;
use dockpick_config::Config;
use dockpick_core::{resolve_entry, snapshot_from_names, CoreError, Session};
use dockpick_provider::{create_gateway, interrupt};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit status after Ctrl-C outside an attached stream
const EXIT_INTERRUPTED: i32 = 130;

const INTERACTIVE_KEYS: &str = "\
Interactive keys:
  <number>   select the container on that row
  <name>     select by exact or partial name (case-sensitive)
  d          toggle the detailed view (IP, uptime, ports, favorites)
  f          show favorites
  h          show recent actions
  q          quit

Container menu:
  1 exec   2 logs     3 stats      4 info
  5 ports  6 restart  7 favorite   8 tail   b back";

#[derive(Parser)]
#[command(name = "dockpick")]
#[command(author, version, about = "Pick a running container and act on it", long_about = None)]
#[command(after_help = INTERACTIVE_KEYS)]
struct Cli {
    /// Container name, or part of one, to open directly
    target: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = load_config(cli.config.as_deref());

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(0);
    }

    if cli.no_color || !std::io::stdout().is_terminal() {
        config.color = false;
    }

    interrupt::install_exit_on_interrupt(EXIT_INTERRUPTED);

    let gateway = create_gateway(&config).await.map_err(CoreError::from)?;
    let snapshot = snapshot_from_names(gateway.list_running().await.map_err(CoreError::from)?);
    tracing::debug!("{} running containers", snapshot.len());

    let entry = resolve_entry(cli.target.as_deref(), &snapshot);
    let stdin = std::io::stdin();
    let mut session = Session::new(
        &*gateway,
        &config,
        snapshot,
        stdin.lock(),
        std::io::stdout(),
    )?;

    Ok(session.run(entry).await?)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Load the config file, falling back to defaults when it cannot be used
fn load_config(path: Option<&Path>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        tracing::warn!("Using default configuration: {}", e);
        Config::default()
    })
}
