pub mod agenda;
pub mod completions;
pub mod history;
pub mod init;
pub mod show;

use crate::output::{CliError, OutputMode, render_error};
use coleta_core::config::{self, PROJECT_DIR, ProjectConfig};
use coleta_core::db::{self, StoreOpenError};
use coleta_core::error::{ColetaError, ErrorCode};
use rusqlite::Connection;
use std::path::Path;

/// Render `error` for the caller and return it as the command's failure.
pub fn report<T>(output: OutputMode, error: ColetaError) -> anyhow::Result<T> {
    render_error(output, &CliError::from(&error))?;
    Err(error.into())
}

/// Load `.coleta/config.toml`, reporting parse failures with their code.
pub fn load_project_config(project_root: &Path, output: OutputMode) -> anyhow::Result<ProjectConfig> {
    match config::load_project_config(project_root) {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            render_error(
                output,
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{e:#}")),
            )?;
            Err(e)
        }
    }
}

/// Open the configured event store for reading.
///
/// The store is opened read-only and never migrated. A missing store means
/// the project was never initialized.
pub fn open_project_store(
    project_root: &Path,
    cfg: &ProjectConfig,
    output: OutputMode,
) -> anyhow::Result<Connection> {
    match db::open_store_read_only(&cfg.store.resolve(project_root)) {
        Ok(conn) => Ok(conn),
        Err(StoreOpenError::Missing { .. }) => report(
            output,
            ColetaError::NotInitialized(project_root.join(PROJECT_DIR)),
        ),
        Err(e) => report(output, ColetaError::Store(e)),
    }
}
