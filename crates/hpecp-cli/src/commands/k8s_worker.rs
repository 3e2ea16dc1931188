//! `hpecp k8sworker` command implementation.

use hpecp::kinds::K8sWorker;
use hpecp::status::WorkerK8sStatus;
use hpecp::{Controller, Transport};

use super::{line, read_ssh_key, resource};
use crate::cli::{CreateDisksArgs, K8sWorkerCommands};
use crate::error::CliError;

/// Disks can only be set once the host reaches `storage_pending`, so setting
/// them at create time requires waiting.
///
/// # Errors
///
/// Returns a usage error when disks are given without a wait.
pub fn preflight_create(disks: &CreateDisksArgs) -> Result<(), CliError> {
    if has_disks(disks) && disks.wait_for_operation_secs == 0 {
        return Err(CliError::usage(
            "If setting disks, 'wait-for-operation-secs' parameter must be greater than zero \
             (recommended 600 seconds)",
        ));
    }
    Ok(())
}

/// Whether any disk was given at create time.
pub(super) fn has_disks(disks: &CreateDisksArgs) -> bool {
    !disks.ephemeral_disks.is_empty() || !disks.persistent_disks.is_empty()
}

/// Executes a worker subcommand.
///
/// # Errors
///
/// Returns the first library or usage error.
pub async fn execute<T: Transport>(
    workers: Controller<'_, K8sWorker, T>,
    command: &K8sWorkerCommands,
) -> Result<String, CliError> {
    match command {
        K8sWorkerCommands::Resource(c) => resource::execute(workers, c).await,
        K8sWorkerCommands::Status(c) => resource::execute_status(workers, c).await,
        K8sWorkerCommands::CreateWithSshKey { ip, key, disks } => {
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
                &[WorkerK8sStatus::StoragePending, WorkerK8sStatus::Error],
                wait,
            )
            .await?;
            if workers.get(&id).await?.status()? == WorkerK8sStatus::Error {
                return Err(CliError::usage(format!(
                    "Create request has errored. Check status message with `hpecp k8sworker get {id}`"
                )));
            }

            if has_disks(disks) {
                workers
                    .set_storage(&id, &disks.ephemeral_disks, &disks.persistent_disks)
                    .await?;
                resource::wait_for_status(workers, &id, &[WorkerK8sStatus::Ready], wait).await?;
            }
            Ok(line(id))
        }
        K8sWorkerCommands::SetStorage {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn disks(ephemeral: &[&str], persistent: &[&str], wait: u64) -> CreateDisksArgs {
        CreateDisksArgs {
            ephemeral_disks: ephemeral.iter().map(ToString::to_string).collect(),
            persistent_disks: persistent.iter().map(ToString::to_string).collect(),
            wait_for_operation_secs: wait,
        }
    }

    #[test]
    fn disks_require_a_wait() {
        assert!(preflight_create(&disks(&["/dev/sdb"], &[], 0)).is_err());
        assert!(preflight_create(&disks(&[], &["/dev/sdc"], 0)).is_err());
        assert!(preflight_create(&disks(&["/dev/sdb"], &[], 600)).is_ok());
        assert!(preflight_create(&disks(&[], &[], 0)).is_ok());
    }
}
