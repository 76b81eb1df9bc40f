//! Build the site

use anyhow::{Context, Result};

use crate::site::BuildSummary;
use crate::Jekyll;

/// Scan the source directory and render everything into the destination
pub fn run(jekyll: &Jekyll) -> Result<BuildSummary> {
    let start = std::time::Instant::now();

    let mut site = jekyll.site();
    let summary = site
        .process()
        .with_context(|| format!("Failed to build {:?}", jekyll.source_dir))?;

    tracing::info!(
        "Built {:?} -> {:?} in {:.2}s",
        jekyll.source_dir,
        jekyll.dest_dir,
        start.elapsed().as_secs_f64()
    );

    Ok(summary)
}
