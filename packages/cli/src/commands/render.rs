use super::{format_output, load_document, render_document};
use crate::config::{Config, OutputFormat};
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Host document (JSON)
    pub input: PathBuf,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,

    /// Emit data-node-id attributes on generic elements
    #[arg(long)]
    pub node_ids: bool,
}

pub async fn render(args: RenderArgs, cwd: &Path) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if args.node_ids {
        config.render.emit_node_ids = true;
    }

    let doc = load_document(&cwd.join(&args.input), &config).await?;
    let output = render_document(&doc, &config).await?;

    let format = args.format.unwrap_or(config.output.format);
    let pretty = args.pretty || config.output.pretty;
    println!("{}", format_output(&output, format, pretty)?);
    Ok(())
}
