use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use easel::script::{parse_script, render_timeline, replay};
use easel::{
    init_logging, session_options, BlobStore, EditorConfig, EventBus, FileStore, MemoryStore,
    Session, BUILD_DATE, VERSION,
};

/// Restore an Easel editing session, replay a script of actions against it
/// and print the resulting history.
#[derive(Parser, Debug)]
#[command(name = "easel", version, about)]
struct Cli {
    /// Config file (JSON or TOML); the platform default is used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Script of actions to replay (JSON array)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Directory of the session store, overriding the config
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Write the final document as an interchange file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Name recorded in the exported file's metadata
    #[arg(long, requires = "export")]
    name: Option<String>,

    /// Keep the session in memory instead of on disk
    #[arg(long, conflicts_with = "store_dir")]
    in_memory: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    tracing::info!("easel {} ({})", VERSION, BUILD_DATE);

    let mut config = match &cli.config {
        Some(path) => EditorConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::load_or_default(None),
    };
    if let Some(dir) = &cli.store_dir {
        config.storage.directory = Some(dir.clone());
    }

    let store: Arc<dyn BlobStore> = if cli.in_memory {
        Arc::new(MemoryStore::new())
    } else {
        let store = FileStore::from_config(&config).context("opening session store")?;
        tracing::info!("Session store at {}", store.root().display());
        Arc::new(store)
    };

    let bus = Arc::new(EventBus::new());
    let mut session = Session::open(store, bus, session_options(&config));
    println!("Restored from {}", session.source());

    if let Some(path) = &cli.script {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let steps = parse_script(&content)?;
        let summary = replay(&mut session, &steps)?;
        println!(
            "Replayed {} steps ({} recorded, {} travelled, {} unchanged)",
            summary.steps, summary.recorded, summary.travelled, summary.unchanged
        );
    }

    if let Err(e) = session.flush() {
        tracing::warn!("Session not fully saved: {}", e);
    }

    print!("{}", render_timeline(session.history()));
    println!("{} items on canvas", session.document().items.len());

    if let Some(path) = &cli.export {
        let json = session.export(cli.name.as_deref()).to_json()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("Exported to {}", path.display());
    }

    session.close();
    Ok(())
}
