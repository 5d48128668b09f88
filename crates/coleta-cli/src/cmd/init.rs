use crate::output::{OutputMode, pretty_kv, render};
use anyhow::{Context as _, Result};
use clap::Args;
use coleta_core::config::{self, PROJECT_DIR, ProjectConfig};
use coleta_core::db::{self, query};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Re-run in an existing project: keeps the settings of a readable
    /// config, resets a malformed one, and migrates the store.
    #[arg(long)]
    pub force: bool,
}

const GITIGNORE: &str = "coleta.db\ncoleta.db-wal\ncoleta.db-shm\n";

#[derive(Debug, Serialize)]
struct InitReport {
    project_dir: PathBuf,
    config: PathBuf,
    store: PathBuf,
    schema_version: i64,
}

/// Execute `coleta init`. Creates the project skeleton:
///
/// ```text
/// .coleta/
///   config.toml   (project config)
///   coleta.db     (empty, migrated event store)
///   .gitignore
/// ```
///
/// An existing store is never truncated. `--force` rewrites the config with
/// its current settings (defaults if it is missing or malformed) and
/// re-applies pending migrations to the store those settings point at.
///
/// # Errors
///
/// Returns an error if `.coleta/` already exists and `--force` is not set,
/// or if any filesystem or store operation fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let project_dir = project_root.join(PROJECT_DIR);

    if project_dir.exists() && !args.force {
        anyhow::bail!(".coleta/ already exists. Use `coleta init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&project_dir).with_context(|| {
        format!(
            "Failed to create project directory: {}",
            project_dir.display()
        )
    })?;

    let config_path = project_dir.join("config.toml");
    let cfg = existing_config(project_root);
    let config_text = config::project_config_toml(&cfg)?;
    std::fs::write(&config_path, config_text)
        .with_context(|| format!("Failed to write config: {}", config_path.display()))?;

    let gitignore_path = project_dir.join(".gitignore");
    std::fs::write(&gitignore_path, GITIGNORE)
        .with_context(|| format!("Failed to write .gitignore: {}", gitignore_path.display()))?;

    let store_path = cfg.store.resolve(project_root);
    let conn = db::open_store(&store_path)?;
    let schema_version = query::store_schema_version(&conn)?;
    tracing::info!(store = %store_path.display(), schema_version, "initialized event store");

    let report = InitReport {
        project_dir,
        config: config_path,
        store: store_path,
        schema_version,
    };

    render(output, &report, |r, w| {
        writeln!(w, "✓ Initialized {PROJECT_DIR}/ project structure.")?;
        writeln!(w)?;
        pretty_kv(w, "config", r.config.display().to_string())?;
        pretty_kv(w, "store", r.store.display().to_string())?;
        pretty_kv(w, "schema", r.schema_version.to_string())?;
        writeln!(w)?;
        writeln!(w, "Next steps:")?;
        writeln!(w, "  Show the collection agenda:")?;
        writeln!(w, "    coleta agenda")
    })
}

/// Settings to keep when reinitializing.
fn existing_config(project_root: &Path) -> ProjectConfig {
    config::load_project_config(project_root).unwrap_or_else(|e| {
        tracing::warn!(error = %format!("{e:#}"), "resetting unreadable project config");
        ProjectConfig::default()
    })
}
