use super::{load_config, read_components, read_store};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use ctb_editor::{Action, EditSession};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Store snapshot (JSON)
    pub store: PathBuf,

    /// JSON array of actions, applied in order
    pub actions: PathBuf,

    /// Directory containing ctb.config.json
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON array of components created during the session
    #[arg(short, long)]
    pub temporary: Option<PathBuf>,

    /// Write the resulting store here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the resulting store
    #[arg(long)]
    pub pretty: bool,
}

pub fn apply(args: ApplyArgs, cwd: &Path) -> Result<()> {
    let config = load_config(args.config.as_ref(), cwd)?;
    let store = read_store(&args.store)?;

    let content = fs::read_to_string(&args.actions)
        .with_context(|| format!("Failed to read {}", args.actions.display()))?;
    let actions: Vec<Action> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid actions in {}", args.actions.display()))?;

    tracing::debug!(
        "[Apply] unresolved components policy: {:?}",
        config.unresolved_components
    );
    let mut session = EditSession::new(store, config);

    if let Some(path) = &args.temporary {
        let records = read_components(path)?;
        tracing::info!(
            "[Apply] {} temporary component(s) from {}",
            records.len(),
            path.display()
        );
        for record in records {
            session.register_temporary_component(record);
        }
    }

    eprintln!(
        "{} {} action(s) from {}",
        "Applying".green().bold(),
        actions.len(),
        args.actions.display()
    );

    for (index, action) in actions.iter().enumerate() {
        match session.dispatch(action) {
            Ok(version) => {
                eprintln!("   {} #{} {} (version {})", "✓".green(), index, action.name(), version)
            }
            Err(err) => {
                eprintln!("   {} #{} {}", "✗".red(), index, action.name());
                return Err(err).with_context(|| format!("Action #{} was rejected", index));
            }
        }
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(session.store())?
    } else {
        serde_json::to_string(session.store())?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("   {} {}", "→".cyan(), path.display());
        }
        None => println!("{}", json),
    }

    let changes = session.diff();
    tracing::info!(
        "[Apply] {} added, {} modified component(s)",
        changes.added_components.len(),
        changes.modified_components.len()
    );
    if !changes.has_changes() {
        eprintln!("   {} Working copy matches the baseline", "✓".green());
    }

    Ok(())
}
