//! Startup credential bootstrap.
//!
//! Vault provisions an AppRole credential pair (role id / secret id) for this
//! service. At startup the pair is exchanged for a Vault token, which is then
//! used to read the API key presented to the Accounts service.

use std::collections::HashMap;

use vaultrs::auth::approle;
use vaultrs::client::{Client, VaultClient, VaultClientSettingsBuilder};
use vaultrs::kv2;

use crate::config::VaultSettings;

/// Field holding the key inside the KV secret.
const API_KEY_FIELD: &str = "api_key";

#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("failed to build Vault client: {0}")]
    Client(String),

    #[error("failed to authenticate to Vault with AppRole: {0}")]
    Login(String),

    #[error("failed to read {mount}/{path} from Vault: {reason}")]
    Read {
        mount: String,
        path: String,
        reason: String,
    },

    #[error("`api_key` not found in Vault secret {0}")]
    MissingKey(String),
}

/// Log in with AppRole and read the Accounts API key.
pub async fn fetch_api_key(settings: &VaultSettings) -> Result<String, SecretsError> {
    let client_settings = VaultClientSettingsBuilder::default()
        .address(&settings.addr)
        .build()
        .map_err(|e| SecretsError::Client(e.to_string()))?;
    let mut client =
        VaultClient::new(client_settings).map_err(|e| SecretsError::Client(e.to_string()))?;

    let auth = approle::login(
        &client,
        &settings.auth_mount,
        &settings.role_id,
        &settings.secret_id,
    )
    .await
    .map_err(|e| SecretsError::Login(e.to_string()))?;
    client.set_token(&auth.client_token);

    let secret: HashMap<String, String> =
        kv2::read(&client, &settings.kv_mount, &settings.api_key_path)
            .await
            .map_err(|e| SecretsError::Read {
                mount: settings.kv_mount.clone(),
                path: settings.api_key_path.clone(),
                reason: e.to_string(),
            })?;

    extract_api_key(secret, &settings.api_key_path)
}

fn extract_api_key(mut secret: HashMap<String, String>, path: &str) -> Result<String, SecretsError> {
    secret
        .remove(API_KEY_FIELD)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| SecretsError::MissingKey(path.to_string()))
}

/// Resolve the Accounts API key for this run.
///
/// Returns `Ok(None)` when no AppRole pair is configured.
pub async fn load_api_key(settings: Option<VaultSettings>) -> Result<Option<String>, SecretsError> {
    match settings {
        Some(settings) => {
            let key = fetch_api_key(&settings).await?;
            tracing::info!("Accounts API key loaded from Vault");
            Ok(Some(key))
        }
        None => {
            tracing::info!("VAULT_ROLE_ID/VAULT_SECRET_ID not set, calling Accounts without an API key");
            Ok(None)
        }
    }
}
