//! Shape Schema CLI
//!
//! Derives storage descriptors from shape documents and applies kind
//! filters, pruning and normalization from the command line.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use familiar_shapes::filter::kinds;
use familiar_shapes::shape::{load_document, normalize, normalize_deep, render_document};
use familiar_shapes::{
    omit_by_kind, omit_by_kind_deep, pick_by_kind, pick_by_kind_deep, prune_empty, Deriver,
    FieldKind, ModelDocument, ShapesConfig,
};
use serde_json::{json, Value};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "shape-schema")]
#[command(about = "Derive storage descriptors and filter model shapes")]
struct Cli {
    /// Explicit config file (on top of shapes.toml and SHAPES__* variables)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive storage descriptors for a shape document or a directory of them
    Derive {
        path: PathBuf,
    },

    /// Keep or drop fields by kind (string, number, boolean, null, ref, date, array, object)
    Filter {
        path: PathBuf,
        /// Kinds to keep
        #[arg(long, value_delimiter = ',', conflicts_with = "omit")]
        pick: Vec<String>,
        /// Kinds to drop
        #[arg(long, value_delimiter = ',')]
        omit: Vec<String>,
        /// Descend into nested objects
        #[arg(long)]
        deep: bool,
        /// Remove branches left empty (also enabled by [filter] prune_after_filter)
        #[arg(long)]
        prune: bool,
        /// Filter the derived descriptor instead of the shape
        #[arg(long)]
        descriptor: bool,
    },

    /// Remove empty nested objects from shapes
    Prune {
        path: PathBuf,
    },

    /// Make every key present, marking optional values as nullable
    Normalize {
        path: PathBuf,
        #[arg(long)]
        deep: bool,
    },

    /// Write the effective configuration to a file
    InitConfig {
        #[arg(default_value = "shapes.toml")]
        output: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ShapesConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Derive { path } => {
            let deriver = Deriver::with_options(config.derive_options());
            let mut outputs = Vec::new();
            for doc in load_documents(&path)? {
                let tree = deriver
                    .derive(&doc.shape)
                    .with_context(|| format!("deriving model {}", doc.model))?;
                let checksum = tree.checksum();
                info!(model = %doc.model, checksum = %checksum.short(), "derived descriptor");

                let mut out = json!({ "model": doc.model, "definition": tree.to_json() });
                if let Some(version) = &doc.version {
                    out["version"] = Value::String(version.version_string());
                }
                if config.output.include_checksum {
                    out["checksum"] = Value::String(checksum.to_string());
                }
                outputs.push(out);
            }
            print_all(&config, outputs)
        }

        Commands::Filter { path, pick, omit, deep, prune, descriptor } => {
            let (names, picking) = match (pick.is_empty(), omit.is_empty()) {
                (false, true) => (pick, true),
                (true, false) => (omit, false),
                _ => bail!("give exactly one of --pick or --omit"),
            };
            let predicates = names
                .iter()
                .map(|n| kinds::by_name(n).with_context(|| format!("unknown kind '{}'", n)))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let predicate = |kind: &FieldKind| predicates.iter().any(|p| p(kind));
            let prune = prune || config.filter.prune_after_filter;

            let mut outputs = Vec::new();
            for doc in load_documents(&path)? {
                let out = if descriptor {
                    let tree = Deriver::with_options(config.derive_options()).derive(&doc.shape)?;
                    let filtered = match (picking, deep) {
                        (true, false) => pick_by_kind(&tree, &predicate)?,
                        (true, true) => pick_by_kind_deep(&tree, &predicate)?,
                        (false, false) => omit_by_kind(&tree, &predicate)?,
                        (false, true) => omit_by_kind_deep(&tree, &predicate)?,
                    };
                    let filtered = if prune { prune_empty(&filtered) } else { filtered };
                    json!({ "model": doc.model, "definition": filtered.to_json() })
                } else {
                    let filtered = match (picking, deep) {
                        (true, false) => pick_by_kind(&doc.shape, &predicate)?,
                        (true, true) => pick_by_kind_deep(&doc.shape, &predicate)?,
                        (false, false) => omit_by_kind(&doc.shape, &predicate)?,
                        (false, true) => omit_by_kind_deep(&doc.shape, &predicate)?,
                    };
                    let shape = if prune { prune_empty(&filtered) } else { filtered };
                    render_document(&ModelDocument { shape, ..doc })
                };
                outputs.push(out);
            }
            print_all(&config, outputs)
        }

        Commands::Prune { path } => {
            let outputs = load_documents(&path)?
                .into_iter()
                .map(|doc| {
                    let shape = prune_empty(&doc.shape);
                    render_document(&ModelDocument { shape, ..doc })
                })
                .collect();
            print_all(&config, outputs)
        }

        Commands::Normalize { path, deep } => {
            let outputs = load_documents(&path)?
                .into_iter()
                .map(|doc| {
                    let shape = if deep { normalize_deep(&doc.shape) } else { normalize(&doc.shape) };
                    render_document(&ModelDocument { shape, ..doc })
                })
                .collect();
            print_all(&config, outputs)
        }

        Commands::InitConfig { output } => {
            config.save(&output)?;
            println!("✅ Wrote configuration to {}", output);
            Ok(())
        }
    }
}

/// Load one document, or every `.json` document below a directory
fn load_documents(path: &Path) -> anyhow::Result<Vec<ModelDocument>> {
    if path.is_file() {
        return Ok(vec![load_document(path).with_context(|| format!("loading {:?}", path))?]);
    }

    let mut docs = Vec::new();
    for entry in WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file = entry.path();
        if !file.is_file() || file.extension().map(|e| e != "json").unwrap_or(true) {
            continue;
        }
        docs.push(load_document(file).with_context(|| format!("loading {:?}", file))?);
    }

    if docs.is_empty() {
        bail!("no shape documents found under {:?}", path);
    }
    info!(count = docs.len(), "loaded shape documents");
    Ok(docs)
}

fn print_all(config: &ShapesConfig, outputs: Vec<Value>) -> anyhow::Result<()> {
    let value = match outputs.len() {
        1 => outputs.into_iter().next().unwrap_or(Value::Null),
        _ => Value::Array(outputs),
    };
    println!("{}", config.render(&value)?);
    Ok(())
}
