use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use cosmic_guidance::{catalog, chat, constants, web_server, GuidanceClient, GuidanceConfig};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Completion relay endpoint (chat-completions compatible).
    #[arg(long, global = true, env = "GUIDANCE_RELAY_URL")]
    relay_url: Option<String>,
    /// Candidate model, tried in the order given. Repeat for fallbacks.
    #[arg(long = "model", global = true)]
    models: Vec<String>,
    /// Seconds to wait on the relay before using fallback guidance.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the web UI.
    Start {
        #[arg(long, default_value_t = constants::DEFAULT_PORT, help = "Port for the web server.")]
        port: u16,
    },
    /// Consult the oracle in the terminal.
    Consult {
        #[arg(long, help = "Your dilemma; asked for interactively when omitted.")]
        dilemma: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=14), help = "Card number (1-14).")]
        card: Option<u64>,
    },
    /// List the fourteen paths.
    Paths {
        #[arg(long, help = "Print as JSON.")]
        json: bool,
    },
    /// Draw guidance for every path at once.
    Spread {
        #[arg(long)]
        dilemma: String,
    },
}

impl Cli {
    fn guidance_config(&self) -> GuidanceConfig {
        let mut config = GuidanceConfig::default();
        if let Some(url) = &self.relay_url {
            config.relay_url = url.clone();
        }
        if !self.models.is_empty() {
            config.models = self.models.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs.max(1));
        }
        config
    }
}

// The main entry point of the application, using tokio's async runtime
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG environment variable (e.g., RUST_LOG=info,cosmic_guidance=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Cosmic Guidance starting with command: {:?}", cli.command);
    let client = GuidanceClient::new(cli.guidance_config());

    match cli.command {
        Commands::Start { port } => {
            info!("Starting web UI on port {}...", port);
            let mut web_server_handle = tokio::spawn(async move {
                if let Err(e) = web_server::start_web_server(port, client).await {
                    error!("Web server failed: {:?}", e);
                }
            });

            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);

            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Ctrl-C received, initiating shutdown...");
                }
                res = &mut web_server_handle => {
                    match res {
                        Ok(_) => info!("Web server task completed unexpectedly."),
                        Err(e) if e.is_panic() => error!("Web server task panicked: {:?}", e),
                        Err(e) => error!("Web server task failed: {:?}", e),
                    }
                }
            }

            if !web_server_handle.is_finished() {
                info!("Aborting web server task...");
                web_server_handle.abort();
            }
            info!("Shutdown complete.");
        }
        Commands::Consult { dilemma, card } => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut out = std::io::stdout();
            chat::run_consultation(&client, dilemma, card.map(|c| c as usize), &mut input, &mut out)
                .await
                .context("Consultation failed")?;
        }
        Commands::Paths { json } => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(catalog::all()).context("Failed to serialize paths")?
                );
            } else {
                for path in catalog::all() {
                    println!("{:>2}. {} {} - {}", path.id, path.icon, path.name, path.subtitle);
                }
            }
        }
        Commands::Spread { dilemma } => {
            let guidances = client.generate_all(catalog::all(), &dilemma).await;
            chat::print_spread(&mut std::io::stdout(), &guidances)?;
        }
    }

    Ok(())
}
