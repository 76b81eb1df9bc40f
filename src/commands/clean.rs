//! Clean the destination directory

use anyhow::Result;
use std::fs;

use crate::Jekyll;

/// Remove the destination directory if it exists
pub fn run(jekyll: &Jekyll) -> Result<()> {
    if jekyll.dest_dir.exists() {
        fs::remove_dir_all(&jekyll.dest_dir)?;
        tracing::info!("Deleted: {:?}", jekyll.dest_dir);
    }

    Ok(())
}
