use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use competitive_erosion::config::Params;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let seed: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let width: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(64);
    let height: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(64);
    let steps: u64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(10_000);

    let params = match args.get(5) {
        Some(path) => {
            Params::load(path).with_context(|| format!("loading parameters from {path}"))?
        }
        None => Params::default(),
    };

    info!(
        seed,
        width,
        height,
        steps,
        colors = params.num_colors,
        edge = ?params.edge,
        source = ?params.source,
        "running competitive erosion"
    );

    let (engine, timings) = competitive_erosion::run(seed, width, height, steps, &params)
        .context("erosion chain failed")?;

    for t in &timings {
        info!("  {:20} {:8.1} ms", t.name, t.ms);
    }
    for (color, count) in engine.counts().iter().enumerate() {
        info!(color, count, "final census");
    }

    Ok(())
}
