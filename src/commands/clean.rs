//! Clean the output directory

use anyhow::{Context, Result};
use std::fs;

use super::build::staging_dir;
use crate::Site;

/// Delete the output directory and any leftover staging directory
pub fn run(site: &Site) -> Result<()> {
    for dir in [site.output_dir.clone(), staging_dir(&site.output_dir)] {
        if dir.exists() {
            fs::remove_dir_all(&dir).with_context(|| format!("Failed to delete {:?}", dir))?;
            tracing::info!("Deleted: {:?}", dir);
        }
    }

    Ok(())
}
