use active_context::{
    ActiveContextHook, BeforeSendHook, Config, ContextCapture, HostServices, OutgoingMessage,
    attachment::{decode_value, is_context_attachment},
    fixture::FixtureHost,
    prompt::format_active_context,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "active-context")]
#[command(about = "Capture and inspect active editor context for chat messages")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture context from a fixture host and print the attachment value
    Capture {
        /// Fixture describing open panes and storage
        #[arg(short, long)]
        fixture: String,
        /// Configuration file path
        #[arg(short, long, default_value = "active-context.toml", env = "ACTIVE_CONTEXT_CONFIG")]
        config: String,
        /// Message body the context is attached to
        #[arg(short, long, default_value = "")]
        message: String,
    },
    /// Decode an attachment value and print the prompt section
    Render {
        /// File holding the attachment value
        #[arg(short, long)]
        payload: String,
        /// Configuration file path
        #[arg(short, long, default_value = "active-context.toml", env = "ACTIVE_CONTEXT_CONFIG")]
        config: String,
    },
    /// Print the effective configuration
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "active-context.toml", env = "ACTIVE_CONTEXT_CONFIG")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Capture {
            fixture,
            config,
            message,
        } => {
            let cfg = Config::load(&config).await?;
            active_context::init_tracing(&cfg.logging.level);

            let host = FixtureHost::load(&fixture)
                .await
                .with_context(|| format!("loading fixture {}", fixture))?;
            info!("Capturing context from {} panes", host.panes.len());

            let marker = cfg.attachment.clone();
            let capture = ContextCapture::new(HostServices::from_single(Arc::new(host)), cfg);
            let hook = ActiveContextHook::new(capture);

            let mut outgoing = OutgoingMessage::new(message);
            hook.before_send(&mut outgoing).await;

            match outgoing
                .attachments
                .iter()
                .find(|a| is_context_attachment(a, &marker))
            {
                Some(attachment) => println!("{}", attachment.value),
                None => {
                    warn!("No active context captured");
                    std::process::exit(1);
                }
            }
        }
        Commands::Render { payload, config } => {
            let cfg = Config::load(&config).await?;
            active_context::init_tracing(&cfg.logging.level);

            let value = tokio::fs::read_to_string(&payload)
                .await
                .with_context(|| format!("reading payload {}", payload))?;
            let snapshot = decode_value(value.trim(), &cfg.attachment);
            if snapshot.is_none() {
                warn!("Payload is not an active context attachment");
            }
            println!("{}", format_active_context(snapshot.as_ref(), &cfg.prompt));
        }
        Commands::Check { config } => {
            let cfg = Config::load(&config).await?;
            active_context::init_tracing(&cfg.logging.level);
            info!("Configuration loaded from {}", config);

            println!("{}", toml::to_string_pretty(&cfg)?);
        }
    }

    Ok(())
}
