//! `hpecp epicworker` command implementation.

use hpecp::kinds::EpicWorker;
use hpecp::status::WorkerEpicStatus;
use hpecp::{Controller, Transport};

use super::k8s_worker::{has_disks, preflight_create};
use super::{line, read_ssh_key, resource};
use crate::cli::EpicWorkerCommands;
use crate::error::CliError;

/// Executes an EPIC worker subcommand.
///
/// # Errors
///
/// Returns the first library or usage error.
pub async fn execute<T: Transport>(
    workers: Controller<'_, EpicWorker, T>,
    command: &EpicWorkerCommands,
) -> Result<String, CliError> {
    match command {
        EpicWorkerCommands::Resource(c) => resource::execute(workers, c).await,
        EpicWorkerCommands::Status(c) => resource::execute_status(workers, c).await,
        EpicWorkerCommands::CreateWithSshKey { ip, key, disks } => {
            preflight_create(disks)?;
            let ssh_key = read_ssh_key(key)?;
            let id = workers.create_with_ssh_key(ip, &ssh_key, &[]).await?;

            let wait = disks.wait_for_operation_secs;
            if wait == 0 {
                return Ok(line(id));
            }

            resource::wait_for_status(
                workers,
                &id,
                &[WorkerEpicStatus::StoragePending, WorkerEpicStatus::Error],
                wait,
            )
            .await?;
            if workers.get(&id).await?.status()? == WorkerEpicStatus::Error {
                return Err(CliError::usage(format!(
                    "Create request has errored. Check status message with `hpecp epicworker get {id}`"
                )));
            }

            if has_disks(disks) {
                workers
                    .set_storage(&id, &disks.ephemeral_disks, &disks.persistent_disks)
                    .await?;
                resource::wait_for_status(workers, &id, &[WorkerEpicStatus::Installed], wait).await?;
            }
            Ok(line(id))
        }
        EpicWorkerCommands::SetStorage {
            id,
            ephemeral_disks,
            persistent_disks,
        } => {
            workers
                .set_storage(id, ephemeral_disks, persistent_disks)
                .await?;
            Ok(String::new())
        }
    }
}
