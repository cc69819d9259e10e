//! Showcase site server.
//!
//! Usage:
//!   showcase                 serve the site (same as `showcase serve`)
//!   showcase sitemap         print sitemap.xml
//!   showcase robots          print robots.txt

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use showcase_kernel::config::Config;
use showcase_kernel::routes;
use showcase_kernel::state::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Port to listen on; overrides PORT.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the sitemap XML to stdout.
    Sitemap,
    /// Print the robots policy to stdout.
    Robots,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Command::Sitemap => {
            let state = AppState::new(&config).context("failed to initialize application state")?;
            print!("{}", state.pages().sitemap().await);
            Ok(())
        }
        Command::Robots => {
            let state = AppState::new(&config).context("failed to initialize application state")?;
            print!("{}", state.pages().robots());
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting Showcase site");
    info!(
        port = config.port,
        site_url = %config.site_url,
        content_api = %config.content_api_url,
        "Configuration loaded"
    );

    let state = AppState::new(&config).context("failed to initialize application state")?;
    if !state.pages().source_available().await {
        info!("content service unreachable; bundled pages will be served until it answers");
    }

    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    // Logs go to stderr so `sitemap` and `robots` output stays clean.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
