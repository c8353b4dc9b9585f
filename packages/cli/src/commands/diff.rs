use super::read_store;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use ctb_editor::diff_working;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Store snapshot (JSON)
    pub store: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Exit with status 1 when the working copy has changes
    #[arg(long)]
    pub check: bool,
}

pub fn diff(args: DiffArgs, _cwd: &Path) -> Result<()> {
    let store = read_store(&args.store)?;
    let changes = diff_working(&store);

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    } else {
        if let Some(doc) = store.working_content_type() {
            let status = if changes.content_type_changed {
                "modified".yellow()
            } else {
                "unchanged".normal()
            };
            println!("{} {} ({})", "content type".bold(), doc.uid, status);
        }
        if let Some(record) = store.edited_component() {
            let status = if changes.component_changed {
                "modified".yellow()
            } else {
                "unchanged".normal()
            };
            println!("{} {} ({})", "component".bold(), record.uid(), status);
        }
        for uid in &changes.added_components {
            println!("   {} {}", "+".green(), uid);
        }
        for uid in &changes.modified_components {
            println!("   {} {}", "~".yellow(), uid);
        }
        if !changes.has_changes() {
            println!("   {} No changes", "✓".green());
        }
    }

    if args.check && changes.has_changes() {
        std::process::exit(1);
    }

    Ok(())
}
