use super::{format_output, load_document, render_document};
use crate::config::{Config, OutputFormat};
use anyhow::{anyhow, Context, Result};
use clap::{Args, ValueEnum};
use quire_editor::{Edit, Position};
use quire_tree::NodeId;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EditOp {
    /// Delete the selection
    Delete,
    /// Break the block at the cursor
    Break,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Host document (JSON)
    pub input: PathBuf,

    /// Node ids to select, `A:B` (before A to after B) or `A` (cursor before A)
    #[arg(short, long)]
    pub select: Option<String>,

    /// Operation to apply after selecting
    #[arg(long, value_enum)]
    pub op: Option<EditOp>,

    /// JSON file with a list of edits to apply in order
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

pub async fn edit(args: EditArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut doc = load_document(&cwd.join(&args.input), &config).await?;

    for edit in planned_edits(&args, cwd)? {
        let name = edit.name();
        doc.apply(edit).with_context(|| format!("Edit '{}' failed", name))?;
    }
    tracing::info!(version = doc.version(), "Applied edits");

    let output = render_document(&doc, &config).await?;
    let format = args.format.unwrap_or(config.output.format);
    println!("{}", format_output(&output, format, config.output.pretty)?);
    Ok(())
}

fn planned_edits(args: &EditArgs, cwd: &Path) -> Result<Vec<Edit>> {
    let mut edits = Vec::new();
    if let Some(script) = &args.script {
        let path = cwd.join(script);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let scripted: Vec<Edit> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a list of edits", path.display()))?;
        edits.extend(scripted);
    }
    if let Some(selection) = &args.select {
        edits.push(parse_selection(selection)?);
    }
    match args.op {
        Some(EditOp::Delete) => edits.push(Edit::DeleteSelection),
        Some(EditOp::Break) => edits.push(Edit::BreakBlock),
        None => {}
    }
    if edits.is_empty() {
        return Err(anyhow!("Nothing to do: pass --select, --op or --script"));
    }
    Ok(edits)
}

/// `A:B` selects from before A to after B; `A` puts the cursor before A.
pub fn parse_selection(text: &str) -> Result<Edit> {
    let parse_id = |part: &str| -> Result<NodeId> {
        part.trim()
            .parse::<u64>()
            .map(NodeId)
            .map_err(|_| anyhow!("Invalid node id '{}'", part))
    };

    Ok(match text.split_once(':') {
        Some((anchor, focus)) => Edit::Select {
            anchor: parse_id(anchor)?,
            anchor_position: Position::Before,
            focus: parse_id(focus)?,
            focus_position: Position::After,
        },
        None => {
            let node = parse_id(text)?;
            Edit::Select {
                anchor: node,
                anchor_position: Position::Before,
                focus: node,
                focus_position: Position::Before,
            }
        }
    })
}
