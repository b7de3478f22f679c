use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,

    /// Also write a sample host document
    #[arg(long)]
    pub sample: bool,
}

const SAMPLE_DOCUMENT: &str = r#"[
  {
    "type": "Element",
    "tag": "p",
    "children": [{ "type": "Text", "content": "Hello, quire" }]
  },
  { "type": "Element", "tag": "p" }
]
"#;

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = Config::path_in(cwd);

    // Check if config already exists
    if config_path.exists() && !args.force {
        eprintln!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        eprintln!("Use --force to overwrite");
        return Ok(());
    }

    let config_json = serde_json::to_string_pretty(&Config::default())?;
    fs::write(&config_path, config_json)?;
    eprintln!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    if args.sample {
        let sample = cwd.join("sample.json");
        if !sample.exists() {
            fs::write(&sample, SAMPLE_DOCUMENT)?;
            eprintln!("  {} Created sample.json", "✓".green());
        }
    }

    eprintln!();
    eprintln!("Next steps:");
    eprintln!("  1. quire inspect sample.json");
    eprintln!("  2. quire render sample.json --pretty");

    Ok(())
}
