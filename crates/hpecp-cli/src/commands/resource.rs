//! Verbs shared by every resource kind.

use std::time::Duration;

use hpecp::list::ColumnSelection;
use hpecp::{
    Controller, OutputFormat, OutputMode, ResourceKind, StatefulKind, StatusEnum, Transport,
};
use serde_json::Value;
use tracing::info;

use crate::cli::{ListArgs, Output, ResourceCommands, StatusCommands};
use crate::error::CliError;

/// Validated output format and columns of a `list`.
///
/// # Errors
///
/// Returns a validation error for an unknown column or a query with an
/// output mode that can't print it.
pub fn list_format<K: ResourceKind>(
    args: &ListArgs,
) -> Result<(OutputFormat, ColumnSelection), CliError> {
    let columns = ColumnSelection::parse(&args.columns);
    columns.resolve::<K>()?;
    let format = OutputFormat::with_query(args.output.into(), args.query.as_deref())?;
    Ok((format, columns))
}

/// Parses `--status a,b` against the kind's status enum.
///
/// # Errors
///
/// Returns a validation error naming the first unknown status.
pub fn parse_statuses<S: StatusEnum>(names: &str) -> Result<Vec<S>, CliError> {
    Ok(S::parse_list(names)?)
}

/// Valid statuses, one per line.
#[must_use]
pub fn statuses<S: StatusEnum>() -> String {
    S::ALL.iter().map(|s| super::line(s.as_str())).collect()
}

/// Argument checks for the shared verbs.
///
/// # Errors
///
/// See [`list_format`].
pub fn preflight<K: ResourceKind>(command: &ResourceCommands) -> Result<(), CliError> {
    if let ResourceCommands::List(args) = command {
        list_format::<K>(args)?;
    }
    Ok(())
}

/// Argument checks for the status verbs; `statuses` is answered directly.
///
/// # Errors
///
/// See [`parse_statuses`].
pub fn preflight_status<K: StatefulKind>(command: &StatusCommands) -> Result<Option<String>, CliError> {
    match command {
        StatusCommands::WaitForStatus { status, .. } => {
            parse_statuses::<K::Status>(status)?;
            Ok(None)
        }
        StatusCommands::WaitForDelete { .. } => Ok(None),
        StatusCommands::Statuses => Ok(Some(statuses::<K::Status>())),
    }
}

/// Runs a shared verb.
///
/// # Errors
///
/// Returns the first library error, or [`CliError::DeleteNotConfirmed`] when
/// a delete wait times out.
pub async fn execute<K: ResourceKind, T: Transport>(
    controller: Controller<'_, K, T>,
    command: &ResourceCommands,
) -> Result<String, CliError> {
    match command {
        ResourceCommands::Get { id, output } => get(controller, id, *output).await,
        ResourceCommands::List(args) => list(controller, args).await,
        ResourceCommands::Delete {
            id,
            wait_for_delete_sec,
        } => {
            controller.delete(id).await?;
            info!(kind = K::NAME, id, "deleted");
            if *wait_for_delete_sec > 0 {
                wait_for_delete(controller, id, *wait_for_delete_sec).await?;
            }
            Ok(String::new())
        }
    }
}

/// Prints one resource.
///
/// # Errors
///
/// Returns the first library error.
pub async fn get<K: ResourceKind, T: Transport>(
    controller: Controller<'_, K, T>,
    id: &str,
    output: Output,
) -> Result<String, CliError> {
    let resource = controller.get(id).await?;
    Ok(OutputFormat::new(output.into()).render_value(resource.json())?)
}

/// Prints the kind's collection.
///
/// # Errors
///
/// See [`list_format`].
pub async fn list<K: ResourceKind, T: Transport>(
    controller: Controller<'_, K, T>,
    args: &ListArgs,
) -> Result<String, CliError> {
    let (format, columns) = list_format::<K>(args)?;
    let list = controller.list_with_columns(&columns).await?;
    Ok(format.render(&list)?)
}

/// Runs a status verb.
///
/// # Errors
///
/// Returns [`CliError::StatusNotReached`] or [`CliError::DeleteNotConfirmed`]
/// when the wait times out.
pub async fn execute_status<K: StatefulKind, T: Transport>(
    controller: Controller<'_, K, T>,
    command: &StatusCommands,
) -> Result<String, CliError> {
    match command {
        StatusCommands::WaitForStatus {
            id,
            status,
            timeout_secs,
        } => {
            let wanted = parse_statuses::<K::Status>(status)?;
            wait_for_status(controller, id, &wanted, *timeout_secs).await?;
            Ok(String::new())
        }
        StatusCommands::WaitForDelete { id, timeout_secs } => {
            wait_for_delete(controller, id, *timeout_secs).await?;
            Ok(String::new())
        }
        StatusCommands::Statuses => Ok(statuses::<K::Status>()),
    }
}

/// Waits for one of `wanted`, failing with the standard message on timeout.
///
/// # Errors
///
/// Returns [`CliError::StatusNotReached`] on timeout.
pub async fn wait_for_status<K: StatefulKind, T: Transport>(
    controller: Controller<'_, K, T>,
    id: &str,
    wanted: &[K::Status],
    timeout_secs: u64,
) -> Result<(), CliError> {
    let reached = controller
        .wait_for_status(id, wanted, Duration::from_secs(timeout_secs))
        .await?;
    if reached {
        Ok(())
    } else {
        Err(CliError::StatusNotReached {
            states: wanted.iter().map(|s| s.as_str().to_string()).collect(),
            timeout_secs,
        })
    }
}

async fn wait_for_delete<K: ResourceKind, T: Transport>(
    controller: Controller<'_, K, T>,
    id: &str,
    timeout_secs: u64,
) -> Result<(), CliError> {
    let gone = controller
        .wait_for_delete(id, Duration::from_secs(timeout_secs))
        .await?;
    if gone {
        Ok(())
    } else {
        Err(CliError::DeleteNotConfirmed {
            id: id.to_string(),
            timeout_secs,
        })
    }
}

/// Renders a raw payload as `yaml` or `json`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_raw(value: &Value, output: &str) -> Result<String, CliError> {
    let mode = if output == "json" {
        OutputMode::Json
    } else {
        OutputMode::Yaml
    };
    Ok(OutputFormat::new(mode).render_value(value)?)
}
