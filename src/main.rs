use anyhow::{Context, Result};
use clap::Parser;
use revenue_insights::{cli::Cli, config::InsightsConfig, dataset, views};
use std::fs;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    // Config file first, then command-line overrides
    let config = match &args.config {
        Some(path) => InsightsConfig::from_toml(path)?,
        None => InsightsConfig::default(),
    };
    let config = args.apply_overrides(config);
    config.validate()?;

    let dataset = dataset::generate_with(&config.generator)?;
    tracing::info!(
        rows = dataset.len(),
        seed = config.generator.seed,
        "generated sales dataset"
    );

    let rendered = views::render_view(&dataset, &args.view_request(&config))?;

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = rendered.len(), "wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
