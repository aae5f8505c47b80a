//! CLI entrypoint for atelier
//!
//! This is the main binary that wires together all layers using
//! dependency injection: config, provider gateway, transcript logger,
//! orchestrator, and the console renderer pumping the event channel.

use anyhow::{Context, Result, bail};
use atelier_application::{
    EventSender, NoTranscript, SessionError, SessionOrchestrator, SessionOutcome, TranscriptLogger,
    agent_catalog,
};
use atelier_infrastructure::{ConfigLoader, FileConfig, GeminiGateway, JsonlTranscriptLogger};
use atelier_presentation::{Cli, Command, EventRenderer, build_request};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Catalog dump needs no config and no credentials.
    if let Some(Command::Agents) = &cli.command {
        println!("{}", serde_json::to_string_pretty(&agent_catalog())?);
        return Ok(());
    }

    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?
    };

    let request = build_request(&cli)?;
    request.validate().context("invalid request")?;

    info!(phase = request.phase.number(), "starting session");

    // === Dependency Injection ===
    let gateway = Arc::new(
        GeminiGateway::from_config(&config.provider)
            .map_err(|e| anyhow::anyhow!("provider setup failed: {e}"))?,
    );

    let transcript: Arc<dyn TranscriptLogger> = if config.transcript.enabled {
        match JsonlTranscriptLogger::new(config.transcript.resolved_path()) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoTranscript),
        }
    } else {
        Arc::new(NoTranscript)
    };

    let orchestrator = SessionOrchestrator::with_transcript(gateway, transcript);
    let renderer = EventRenderer::new(cli.output, cli.quiet);

    let (events, mut receiver) = EventSender::channel(64);
    let pipeline = tokio::spawn(async move { orchestrator.run(request, events).await });

    // Pump the channel until the orchestrator closes it.
    while let Some(event) = receiver.recv().await {
        renderer.render(&event);
    }

    match pipeline.await? {
        Ok(SessionOutcome::AwaitingSelection { ideas, .. }) => {
            if !cli.quiet {
                eprintln!(
                    "\n{} candidate(s) ready. Re-run with --phase 2 and a request file carrying \
                     your selected idea.",
                    ideas.len()
                );
            }
            Ok(())
        }
        Ok(SessionOutcome::Phase1Complete { .. }) => Ok(()),
        Ok(SessionOutcome::Completed { .. }) => Ok(()),
        Err(SessionError::Cancelled) => Ok(()),
        Err(e) => bail!("session failed: {e}"),
    }
}
