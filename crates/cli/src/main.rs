mod check;
mod mapping;
mod remote;
mod serve;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Plugtest conditional-request resource.
#[derive(Parser)]
#[command(
    name = "plugtest",
    version,
    about = "ETag plugtest resource server and conformance checker"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the plugtest resource over HTTP at /test
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080", env = "PLUGTEST_PORT")]
        port: u16,
        /// Seed the tag generator for reproducible tags
        #[arg(long, env = "PLUGTEST_SEED")]
        seed: Option<u64>,
        /// Response payload buffer capacity in bytes
        #[arg(long, default_value_t = plugtest_core::MAX_PLUGTEST_PAYLOAD, env = "PLUGTEST_PAYLOAD_LIMIT")]
        payload_limit: usize,
    },

    /// Run the conformance checks, in-process or against a running server
    Check {
        /// Base URL of a running `plugtest serve` (e.g. http://127.0.0.1:8080)
        #[arg(long, env = "PLUGTEST_URL")]
        url: Option<String>,
        /// Seed for the in-process resources
        #[arg(long, env = "PLUGTEST_SEED")]
        seed: Option<u64>,
    },
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Serve {
            port,
            seed,
            payload_limit,
        } => {
            let config = serve::ServeConfig {
                port,
                seed,
                payload_limit,
            };
            if let Err(e) = rt.block_on(serve::start_server(config)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
        Commands::Check { url, seed } => {
            let ok = rt.block_on(check::cmd_check(url.as_deref(), seed, cli.output, cli.quiet));
            if !ok {
                process::exit(1);
            }
        }
    }
}
