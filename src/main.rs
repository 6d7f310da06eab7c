//! `cvmatch` command line entrypoint.
//!
//! Reads a JSON fixture, matches its requirements against the owner's profile
//! items and prints the report as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;

use cvmatch::config::Config;
use cvmatch::embedding::HttpEmbeddingProvider;
use cvmatch::engine::{MatchReport, MatchingEngine};
use cvmatch::fixture::Fixture;
use cvmatch::store::{ComponentStore, MemoryComponentStore, QdrantComponentStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage: cvmatch <fixture.json>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        anyhow::bail!(USAGE);
    };
    if path.as_os_str() == "--help" || path.as_os_str() == "-h" {
        println!("{USAGE}");
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let fixture = Fixture::from_path(&path)
        .with_context(|| format!("loading fixture {}", path.display()))?;

    tracing::info!(
        owner_id = %fixture.owner_id,
        requirements = fixture.requirements.len(),
        profile_items = fixture.profile_items.len(),
        provider_url = %config.provider_url,
        model = %config.provider_model,
        "cvmatch starting"
    );

    let provider = HttpEmbeddingProvider::new(
        config.provider_url.clone(),
        config.provider_model.clone(),
        config.provider_api_key.clone(),
    );

    let report = match &config.qdrant_url {
        Some(url) => {
            let store = Arc::new(QdrantComponentStore::new(url, config.qdrant_collection.clone())?);
            let engine = MatchingEngine::from_config(&config, provider, Arc::clone(&store))?;

            let items = engine.embed_profile_items(fixture.profile_items.clone()).await;
            store.ensure_collection(config.embedding_dim as u64).await?;
            let written = store.upsert_items(&fixture.owner_id, &items).await?;
            tracing::info!(
                url = %url,
                collection = %store.collection(),
                written,
                "Profile items indexed"
            );

            run(&engine, &fixture).await?
        }
        None => {
            tracing::info!("No CVMATCH_QDRANT_URL configured, using in-memory store");
            let store = Arc::new(MemoryComponentStore::new());
            let engine = MatchingEngine::from_config(&config, provider, Arc::clone(&store))?;

            for item in engine.embed_profile_items(fixture.profile_items.clone()).await {
                store.insert(&fixture.owner_id, item);
            }

            run(&engine, &fixture).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run<S: ComponentStore>(
    engine: &MatchingEngine<HttpEmbeddingProvider, S>,
    fixture: &Fixture,
) -> anyhow::Result<MatchReport> {
    let report = engine
        .run(&fixture.owner_id, &fixture.requirements, &fixture.focus_areas)
        .await?;

    if let Some(stats) = engine.embeddings().cache().map(|cache| cache.stats()) {
        tracing::debug!(?stats, "Embedding cache stats");
    }

    Ok(report)
}
