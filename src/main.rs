use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usedcars::{BatchAnalyzer, BatchConfig, StorageEngine};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout carries only the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "usedcars=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BatchConfig::from_env();
    tracing::info!(
        "Using CSV {} and store {}",
        config.csv_path.display(),
        config.data_dir.display()
    );

    let mut storage = StorageEngine::open(&config.data_dir)?;

    let analyzer = BatchAnalyzer::new(config);
    let result = analyzer.run(&mut storage, std::io::stdout().lock());

    // The store is released whatever the outcome of the run
    let closed = storage.close();

    if let Err(e) = &result {
        tracing::error!("Batch run failed: {}", e);
    }
    result?;
    closed?;
    Ok(())
}
