use super::load_document;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Host document (JSON)
    pub input: PathBuf,
}

/// Print the parsed tree with node ids, kinds and attributes.
pub async fn inspect(args: InspectArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let doc = load_document(&cwd.join(&args.input), &config).await?;
    let dump = doc.dump().ok_or_else(|| anyhow!("Document has no root"))?;

    tracing::info!(nodes = dump.size(), "Parsed document");
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}
