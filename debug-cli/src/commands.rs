use error_common::{DebuggerError, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use zanzibar_debug::{
    split_userset, DebugError, ExpandClient, HttpExpandClient, PermissionDebugger, StaticExpandClient,
};

use crate::cli::{Cli, Command, QueryArgs};
use crate::output;
use crate::settings::Settings;

/// Run one command, returning what to print on stdout
pub async fn run(cli: &Cli) -> Result<String> {
    let query = match &cli.command {
        Command::Explain { query, .. } | Command::Records { query } => query,
    };
    validate_query(query)?;

    let settings = Settings::load(cli.config.as_deref(), &cli.overrides())?;
    let client = build_client(&settings, cli.fixture.as_deref())?;
    let debugger = PermissionDebugger::new(client, settings.expander_config());

    match &cli.command {
        Command::Explain { query, format } => {
            let explanation = debugger
                .explain(&query.object, &query.relation, &query.user)
                .await;
            eprintln!("{}", output::summary(&explanation, &query.user));
            output::render(&explanation, *format)
        }
        Command::Records { query } => {
            let nodes = debugger
                .collect(&query.object, &query.relation, &query.user)
                .await;
            Ok(serde_json::to_string_pretty(&nodes)?)
        }
    }
}

/// Fixture replay when given, the configured HTTP store otherwise
pub fn build_client(settings: &Settings, fixture: Option<&Path>) -> Result<Arc<dyn ExpandClient>> {
    if let Some(path) = fixture {
        info!(fixture = %path.display(), "Replaying captured expansion trees");
        let client = StaticExpandClient::from_fixture_file(path)
            .map_err(|e| DebuggerError::InputError(e.to_string()))?;
        return Ok(Arc::new(client));
    }

    if settings.store_id.trim().is_empty() {
        return Err(DebuggerError::ConfigError(
            "store_id is required (--store-id, ZANZIBAR_DEBUG_STORE_ID or settings file)".to_string(),
        ));
    }

    info!(api_url = %settings.api_url, store_id = %settings.store_id, "Using expansion API");
    let client = HttpExpandClient::new(settings.client_config()).map_err(|e| match e {
        DebugError::InvalidConfig(msg) => DebuggerError::ConfigError(msg),
        other => DebuggerError::ExternalError(other.to_string()),
    })?;
    Ok(Arc::new(client))
}

/// Reject queries the expansion service could never answer
pub fn validate_query(query: &QueryArgs) -> Result<()> {
    if query.object.trim().is_empty() || query.relation.trim().is_empty() || query.user.trim().is_empty() {
        return Err(DebuggerError::ValidationError(
            "--object, --relation and --user must not be empty".to_string(),
        ));
    }

    if split_userset(&query.object).1.is_some() {
        return Err(DebuggerError::ValidationError(format!(
            "--object takes a bare object id, got userset '{}'",
            query.object
        )));
    }

    Ok(())
}
