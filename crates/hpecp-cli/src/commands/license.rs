//! `hpecp license` command implementation.

use hpecp::Transport;
use hpecp::license::LicenseController;
use serde_json::Value;

use super::{line, resource};
use crate::cli::LicenseCommands;
use crate::error::CliError;

/// Executes a license subcommand.
///
/// # Errors
///
/// Returns the first library error.
pub async fn execute<T: Transport>(
    licenses: LicenseController<'_, T>,
    command: &LicenseCommands,
) -> Result<String, CliError> {
    match command {
        LicenseCommands::PlatformId => Ok(line(licenses.platform_id().await?)),
        LicenseCommands::List {
            output,
            license_key_only,
        } => {
            let list = licenses.list().await?;
            if *license_key_only {
                Ok(license_keys(&list).iter().map(line).collect())
            } else {
                resource::render_raw(&list, output)
            }
        }
        LicenseCommands::Register { server_filename } => {
            Ok(line(licenses.register(server_filename).await?))
        }
        LicenseCommands::Delete { license_key } => {
            licenses.delete(license_key).await?;
            Ok(String::new())
        }
        LicenseCommands::DeleteAll => {
            for key in license_keys(&licenses.list().await?) {
                licenses.delete(&key).await?;
            }
            Ok(String::new())
        }
    }
}

/// `LicenseKey` of every entry under `Licenses`.
fn license_keys(list: &Value) -> Vec<String> {
    list.get("Licenses")
        .and_then(Value::as_array)
        .map(|licenses| {
            licenses
                .iter()
                .filter_map(|l| l.get("LicenseKey").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_collected_in_order() {
        let list = json!({"Licenses": [
            {"LicenseKey": "1234 5678 \"A\"", "Unlicensed": false},
            {"Unlicensed": true},
            {"LicenseKey": "9999 \"B\""},
        ]});
        assert_eq!(license_keys(&list), vec!["1234 5678 \"A\"", "9999 \"B\""]);
        assert!(license_keys(&json!({})).is_empty());
    }
}
