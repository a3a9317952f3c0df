//! Forseti - natural-language browser control
//!
//! Main entry point for the CLI application.

use clap::Parser;
use forseti::core::ProviderType;
use forseti::{Config, Repl};

/// Forseti - natural-language browser control
#[derive(Parser, Debug)]
#[command(name = "forseti")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Model used by the translation service
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,

    /// Use the offline keyword translator instead of the API
    #[arg(long)]
    offline: bool,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Run in headed browser mode (visible window)
    #[arg(long)]
    headed: bool,

    /// Single command mode (non-interactive)
    #[arg(long, short = 'p')]
    prompt: Option<String>,
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "forseti=debug" } else { "forseti=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(model) = args.model {
        config.translator.model = model;
    }

    if let Some(base_url) = args.base_url {
        config.translator.base_url = base_url;
    }

    if args.offline {
        config.translator.provider = ProviderType::Keyword;
    }

    if args.debug {
        config.agent.debug = true;
    }

    if args.headed {
        config.browser.headed = true;
    }

    init_tracing(config.agent.debug);

    let mut repl = Repl::with_config(config).await?;

    // Single command mode
    if let Some(prompt) = args.prompt {
        println!("{}", repl.run_once(&prompt).await);
        return Ok(());
    }

    repl.run().await?;

    Ok(())
}
