use super::{load_config, read_components, read_store};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use ctb_editor::{
    ComponentRecord, ComponentSources, DependencyResolver, SchemaMap, SchemaRef,
    TemporaryRegistry,
};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ClosureArgs {
    /// Store snapshot (JSON)
    pub store: PathBuf,

    /// Component or content type uid
    pub uid: String,

    /// Directory containing ctb.config.json
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON array of components created during the session
    #[arg(short, long)]
    pub temporary: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn closure(args: ClosureArgs, cwd: &Path) -> Result<()> {
    let config = load_config(args.config.as_ref(), cwd)?;
    let store = read_store(&args.store)?;
    let uid = SchemaRef::parse(&args.uid)?;

    let mut temporary = TemporaryRegistry::new();
    if let Some(path) = &args.temporary {
        for record in read_components(path)? {
            temporary.register(record);
        }
    }

    // A content type is not itself a component: start from its references
    let roots: Vec<SchemaRef> = match store.baseline_content_type(uid.as_str()) {
        Some(doc) => doc.component_refs().cloned().collect(),
        None if store.baseline_component(uid.as_str()).is_some() || temporary.contains(uid.as_str()) => {
            vec![uid.clone()]
        }
        None => return Err(anyhow!("No content type or component named {}", uid)),
    };

    let baseline: &SchemaMap<ComponentRecord> = store.baseline_components();
    let sources = ComponentSources::new().chain(baseline).chain(&temporary);
    let resolver = DependencyResolver::new(sources, config.unresolved_components);
    let closure = resolver.resolve_all(roots.iter(), &SchemaMap::new())?;
    tracing::info!(
        "[Closure] {} from {} root(s): {} component(s)",
        uid,
        roots.len(),
        closure.len()
    );

    if args.format == "json" {
        let uids: Vec<&SchemaRef> = closure.to_add.keys().collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "uid": uid,
                "components": uids,
                "skipped": closure.skipped,
            }))?
        );
        return Ok(());
    }

    println!("{}", uid.as_str().bold());
    for (dep, record) in closure.to_add.iter() {
        let marker = if record.is_temporary { " (temporary)".yellow() } else { "".normal() };
        println!("   {} {}{}", "→".cyan(), dep, marker);
    }
    for skipped in &closure.skipped {
        println!("   {} {} (unresolved)", "✗".red(), skipped);
    }
    if closure.is_empty() && closure.skipped.is_empty() {
        println!("   {} No component dependencies", "✓".green());
    }

    Ok(())
}
