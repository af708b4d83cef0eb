//! Command handlers, one module per `tickets` verb.

pub mod assign;
pub mod comment;
pub mod completions;
pub mod create;
pub mod delete;
pub mod list;
pub mod show;
pub mod stats;
pub mod update;

use std::path::Path;

use tickets_core::TicketError;
use tickets_core::config;
use tickets_core::error::ErrorCode;
use tickets_core::store::TicketStore;

use crate::output::{CliError, OutputMode, render_error};
use crate::validate::ValidationError;

/// Resolve config and open the ticket store, reporting failures on stderr.
pub fn open_store(
    project_root: &Path,
    dir_flag: Option<&Path>,
    output: OutputMode,
) -> anyhow::Result<TicketStore> {
    let store_config = match config::resolve_store_config(project_root, dir_flag) {
        Ok(cfg) => cfg,
        Err(e) => {
            let code = ErrorCode::ConfigParseError;
            render_error(
                output,
                &CliError::with_details(
                    format!("{e:#}"),
                    code.hint().unwrap_or_else(|| code.message()),
                    code.code(),
                ),
            )?;
            return Err(e);
        }
    };
    tracing::debug!(dir = %store_config.dir.display(), "resolved ticket store");
    surface(output, TicketStore::open(&store_config))
}

/// Pass a store result through, rendering any error before propagating it.
pub fn surface<T>(output: OutputMode, result: Result<T, TicketError>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            if err.is_storage_failure() {
                let cause = std::error::Error::source(&err).map(ToString::to_string);
                tracing::debug!(error = %err, ?cause, "ticket storage failure");
            }
            render_error(output, &CliError::from(&err))?;
            Err(err.into())
        }
    }
}

/// Render a validation failure and turn it into the command's error.
pub fn reject(output: OutputMode, err: &ValidationError) -> anyhow::Error {
    if let Err(render_err) = render_error(output, &err.to_cli_error()) {
        return render_err;
    }
    anyhow::anyhow!("invalid {}: {}", err.field, err.reason)
}
