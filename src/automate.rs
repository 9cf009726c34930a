//! Run orchestration: receive, flatten, promote, publish, report.
//!
//! This is the only place errors are caught: any failure in the pipeline is
//! logged, reported through `mark_exception`, and turned into
//! [`RunOutcome::Failed`].

use tracing::{error, info, instrument};

use crate::config::RunConfig;
use crate::naming::compose_target_model_name;
use crate::platform::AutomationPlatform;
use crate::{codec, flatten, promote, Result};

pub const TARGET_MODEL_NOT_FOUND: &str = "Target model not found.";

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The version was published and the context view points at it.
    Succeeded {
        model_id: String,
        version_id: String,
        model_name: String,
        rows: usize,
    },
    /// The version was published but its model could not be found by name.
    TargetModelNotFound { model_name: String, version_id: String },
    Failed(String),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded { .. })
    }
}

/// Execute one run against `platform`.
#[instrument(skip_all, fields(prefix = %config.target_model_prefix))]
pub async fn run<P: AutomationPlatform + ?Sized>(platform: &P, config: &RunConfig) -> RunOutcome {
    match try_run(platform, config).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(%err, "run failed");
            let message = err.to_string();
            platform.mark_exception(&message);
            RunOutcome::Failed(message)
        }
    }
}

async fn try_run<P: AutomationPlatform + ?Sized>(platform: &P, config: &RunConfig) -> Result<RunOutcome> {
    config.validate()?;
    let skip = config.skip_set();

    info!("receiving version");
    let snapshot = platform.receive_version().await?;
    let graph = codec::import(snapshot, skip.element_aliases())?;
    info!(nodes = graph.len(), "received version");

    let mut rows = flatten(&graph, &skip)?;
    if config.promote_parameters {
        info!("promoting named parameters");
        rows = promote(rows, &skip);
    }
    info!(rows = rows.len(), "flattened graph");

    let source_model_name = platform.trigger_model_name().await?;
    let model_name = compose_target_model_name(&source_model_name, &config.target_model_prefix)?;
    info!(%model_name, "generated target model name");

    let objects = codec::export(&graph, &rows);
    let version_id = platform
        .create_version(&model_name, &config.version_message, objects)
        .await?;
    info!(%version_id, "created new version");

    let Some(model_id) = platform.resolve_model_id(&model_name).await? else {
        error!(%model_name, "no matching model found for the target name");
        platform.mark_exception(TARGET_MODEL_NOT_FOUND);
        return Ok(RunOutcome::TargetModelNotFound { model_name, version_id });
    };

    let view = format!("{model_id}@{version_id}");
    platform.set_context_view(vec![view]);
    platform.mark_success(&format!("Created new version: {version_id}"));

    Ok(RunOutcome::Succeeded { model_id, version_id, model_name, rows: rows.len() })
}
