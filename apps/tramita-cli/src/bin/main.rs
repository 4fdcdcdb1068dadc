use std::env;
use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use tramita_core::config::{resolve_with_base, Settings};
use tramita_core::error::Error;
use tramita_core::types::Readiness;
use tramita_embed::embedder_from_settings;
use tramita_rag::agent::{AgentAction, RequestAgent};
use tramita_rag::log::InteractionLogger;
use tramita_rag::{GeminiClient, QueryEngine};

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {prog} <ingest|query|agent|status> [args...]");
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn build_engine(settings: Settings) -> anyhow::Result<Arc<QueryEngine>> {
    let base_dir = env::current_dir()?;
    let embedder = embedder_from_settings(&settings)?;
    let model = GeminiClient::from_settings(&settings)
        .map(|c| Arc::new(c) as Arc<dyn tramita_core::traits::GenerativeModel>);
    if model.is_none() {
        tracing::warn!("no API key configured; queries will fail until one is set");
    }
    Ok(Arc::new(QueryEngine::new(settings, base_dir, embedder, model)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    let logger = InteractionLogger::new(resolve_with_base(
        &env::current_dir()?,
        &settings.data.log_file,
    ));
    let (cmd, args) = parse_args();

    match cmd.as_str() {
        "ingest" => {
            let engine = build_engine(settings)?;
            let report = engine.rebuild().await?;
            println!(
                "Ingest complete: {} documents, {} fragments",
                report.documents, report.fragments
            );
            for source in &report.skipped {
                println!("  skipped (no text): {source}");
            }
        }
        "query" => {
            let question = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: tramita query \"<question>\"");
                std::process::exit(1)
            });
            let engine = build_engine(settings)?;
            if let Err(e) = engine.load_index() {
                eprintln!("Could not load index: {e}");
                std::process::exit(1);
            }
            let started = Instant::now();
            match engine.answer(&question).await {
                Ok(result) => {
                    println!("{}", result.answer);
                    if !result.sources.is_empty() {
                        println!("\nFuentes: {}", result.sources.join(", "));
                    }
                    logger.record(
                        "query",
                        "cli",
                        &question,
                        &result.answer,
                        started.elapsed().as_millis(),
                        &result.sources,
                        None,
                    );
                }
                Err(e) => {
                    report_query_error(&e);
                    std::process::exit(1);
                }
            }
        }
        "agent" => {
            let instruction = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: tramita agent \"<instruction>\" [user_id]");
                std::process::exit(1)
            });
            let user_id = args.get(1).cloned().unwrap_or_else(|| "cli".to_string());
            let engine = build_engine(settings)?;
            if let Err(e) = engine.load_index() {
                eprintln!("Could not load index: {e}");
                std::process::exit(1);
            }
            let started = Instant::now();
            match RequestAgent::new(Arc::clone(&engine))
                .perform(&instruction, &user_id)
                .await
            {
                Ok(action) => {
                    let (answer, sources) = match &action {
                        AgentAction::Answered(a) => (a.answer.clone(), a.sources.clone()),
                        AgentAction::ArtifactCreated { path, record } => {
                            println!("Solicitud creada: {}", path.display());
                            (record.answer.clone(), record.sources.clone())
                        }
                    };
                    println!("{answer}");
                    logger.record(
                        "agent",
                        &user_id,
                        &instruction,
                        &answer,
                        started.elapsed().as_millis(),
                        &sources,
                        Some(action.tag()),
                    );
                }
                Err(e) => {
                    report_query_error(&e);
                    std::process::exit(1);
                }
            }
        }
        "status" => {
            let engine = build_engine(settings)?;
            if let Err(e) = engine.load_index() {
                eprintln!("Index artifacts present but unusable: {e}");
            }
            match engine.readiness() {
                Readiness::Ready => {
                    let fragments = engine.index_snapshot().map_or(0, |i| i.len());
                    println!("ready ({fragments} fragments indexed)");
                }
                Readiness::NotBuilt => println!("not built — run `tramita ingest`"),
                Readiness::Misconfigured => {
                    println!("misconfigured — set GEMINI_API_KEY or GOOGLE_API_KEY")
                }
            }
        }
        _ => {
            eprintln!("Unknown command: {cmd}");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Different failure classes get different operator hints.
fn report_query_error(error: &Error) {
    match error {
        Error::Config(_) => eprintln!("Configuration problem: {error}"),
        Error::IndexNotReady => eprintln!("{error} (try `tramita ingest`)"),
        Error::Generation(_) => eprintln!("The language model could not be reached: {error}"),
        other => eprintln!("{other}"),
    }
}
