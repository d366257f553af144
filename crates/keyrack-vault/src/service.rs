// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault orchestration: enrollment, verification, and authentication-gated
//! CRUD over credential records.
//!
//! Authentication is stateless per request: every operation re-verifies the
//! master password supplied with it, then re-derives the encryption key from
//! the persisted salt when the operation needs the cipher. Nothing derived
//! from the master password survives a request -- there is no session and no
//! key cache. The encryption salt is read from the store at the start of each
//! operation that needs it, never held in process-wide state.

use std::num::NonZeroU32;

use keyrack_config::model::VaultConfig;
use keyrack_core::{CreateOutcome, DecryptedCredential, KeyrackError, Updated, VaultStatus};
use keyrack_storage::Database;
use keyrack_storage::queries::credentials::{self, InsertOutcome};
use keyrack_storage::queries::master;
use keyrack_storage::queries::settings::{self, ENCRYPTION_SALT_KEY};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto;
use crate::generate;
use crate::kdf;
use crate::policy;

/// The vault service: sole owner of the duplicate policy, the strength rule,
/// and every invariant over the persisted crypto material.
pub struct VaultService {
    db: Database,
    iterations: NonZeroU32,
    password_length: usize,
}

impl std::fmt::Debug for VaultService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultService")
            .field("iterations", &self.iterations)
            .field("password_length", &self.password_length)
            .finish_non_exhaustive()
    }
}

impl VaultService {
    /// Create a service over an opened database.
    pub fn new(db: Database, config: &VaultConfig) -> Result<Self, KeyrackError> {
        let iterations = NonZeroU32::new(config.kdf_iterations)
            .ok_or_else(|| KeyrackError::Config("vault.kdf_iterations must be non-zero".into()))?;
        Ok(Self {
            db,
            iterations,
            password_length: config.generated_password_length,
        })
    }

    /// Report whether a master password has been enrolled. No authentication.
    pub async fn status(&self) -> Result<VaultStatus, KeyrackError> {
        let is_initialized = master::get_password_hash(&self.db).await?.is_some();
        Ok(VaultStatus { is_initialized })
    }

    /// One-time enrollment of the master password.
    ///
    /// Also generates and persists the vault-wide encryption salt if absent;
    /// the first persisted salt wins, so repeated racing calls cannot split
    /// the vault across two salts.
    pub async fn initialize(&self, master_password: &SecretString) -> Result<(), KeyrackError> {
        if master::get_password_hash(&self.db).await?.is_some() {
            return Err(KeyrackError::AlreadyInitialized);
        }
        policy::validate_strength(master_password.expose_secret())?;

        let hash = {
            let password = secret_bytes(master_password);
            let iterations = self.iterations;
            tokio::task::spawn_blocking(move || kdf::hash_master_password(&password, iterations))
                .await
                .map_err(map_join_err)??
        };

        // The insert re-checks existence inside its transaction; losing the
        // race is still AlreadyInitialized.
        if !master::insert_password_hash(&self.db, hash).await? {
            return Err(KeyrackError::AlreadyInitialized);
        }

        let candidate = kdf::generate_encryption_salt()?;
        settings::ensure_value(&self.db, ENCRYPTION_SALT_KEY, candidate.to_vec()).await?;

        info!("vault initialized");
        Ok(())
    }

    /// Verify the master password against the stored hash.
    pub async fn verify(&self, master_password: &SecretString) -> Result<(), KeyrackError> {
        self.authenticate(master_password).await
    }

    /// List the distinct app names across all records, sorted. Requires
    /// authentication; decrypts nothing.
    pub async fn list_apps(
        &self,
        master_password: &SecretString,
    ) -> Result<Vec<String>, KeyrackError> {
        self.authenticate(master_password).await?;
        credentials::list_app_names(&self.db).await
    }

    /// Create a credential, or report the record already holding the
    /// normalized (app_name, username) pair.
    ///
    /// When `password` is `None` a strong password is generated and returned
    /// in the outcome -- the only time it is ever available in plaintext.
    /// An explicit password must pass the strength rule.
    pub async fn create_credential(
        &self,
        master_password: &SecretString,
        app_name: &str,
        username: &str,
        created_by: &str,
        password: Option<String>,
    ) -> Result<CreateOutcome, KeyrackError> {
        self.authenticate(master_password).await?;

        let app_name = policy::normalize_label(app_name);
        let created_by = policy::normalize_label(created_by);

        // Cheap pre-check so a duplicate response does not pay for a key
        // derivation. The insert below re-checks inside its transaction.
        if let Some(existing) =
            credentials::find_by_app_and_username(&self.db, &app_name, username).await?
        {
            debug!(existing_id = existing.id, "duplicate credential refused");
            return Ok(duplicate_outcome(existing));
        }

        let (plaintext, generated) = match password {
            Some(supplied) => {
                policy::validate_strength(&supplied)?;
                (Zeroizing::new(supplied), false)
            }
            None => (
                Zeroizing::new(generate::generate_password(self.password_length)),
                true,
            ),
        };

        let key = self.derive_key(master_password).await?;
        let blob = crypto::seal(&key, plaintext.as_bytes())?;

        match credentials::insert_credential(&self.db, &app_name, username, &created_by, blob)
            .await?
        {
            InsertOutcome::Inserted(id) => {
                info!(id, app = %app_name, "credential created");
                Ok(CreateOutcome::Created {
                    id,
                    generated_password: generated.then(|| plaintext.to_string()),
                })
            }
            InsertOutcome::Duplicate(existing) => {
                debug!(existing_id = existing.id, "duplicate credential refused");
                Ok(duplicate_outcome(existing))
            }
        }
    }

    /// Replace the encrypted password of an existing record in place.
    /// Id, app name, username, and author are unchanged.
    pub async fn update_credential(
        &self,
        master_password: &SecretString,
        id: i64,
        password: Option<String>,
    ) -> Result<Updated, KeyrackError> {
        self.authenticate(master_password).await?;

        if credentials::get_credential(&self.db, id).await?.is_none() {
            return Err(KeyrackError::NotFound { id });
        }

        let (plaintext, generated) = match password {
            Some(supplied) => (Zeroizing::new(supplied), false),
            None => (
                Zeroizing::new(generate::generate_password(self.password_length)),
                true,
            ),
        };

        let key = self.derive_key(master_password).await?;
        let blob = crypto::seal(&key, plaintext.as_bytes())?;

        if !credentials::update_password(&self.db, id, blob).await? {
            return Err(KeyrackError::NotFound { id });
        }

        info!(id, "credential password updated");
        Ok(Updated {
            id,
            generated_password: generated.then(|| plaintext.to_string()),
        })
    }

    /// List credentials with decrypted passwords, optionally filtered by
    /// exact app name.
    ///
    /// A record that fails integrity-checked decryption aborts the whole
    /// listing with [`KeyrackError::Decryption`] -- storage tampering must
    /// never surface as garbage plaintext.
    pub async fn list_credentials(
        &self,
        master_password: &SecretString,
        app_name: Option<&str>,
    ) -> Result<Vec<DecryptedCredential>, KeyrackError> {
        self.authenticate(master_password).await?;

        let records = credentials::list_credentials(&self.db, app_name).await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let key = self.derive_key(master_password).await?;
        records
            .into_iter()
            .map(|record| {
                let plaintext = crypto::open(&key, &record.encrypted_password)?;
                let password =
                    String::from_utf8(plaintext).map_err(|_| KeyrackError::Decryption)?;
                Ok(DecryptedCredential {
                    id: record.id,
                    app_name: record.app_name,
                    username: record.username,
                    created_by: record.created_by,
                    password,
                })
            })
            .collect()
    }

    /// Delete a credential by id.
    ///
    /// Authenticated like every other operation, so an uninitialized vault
    /// answers NotInitialized rather than dereferencing a missing hash.
    pub async fn delete_credential(
        &self,
        master_password: &SecretString,
        id: i64,
    ) -> Result<(), KeyrackError> {
        self.authenticate(master_password).await?;

        if !credentials::delete_credential(&self.db, id).await? {
            return Err(KeyrackError::NotFound { id });
        }
        info!(id, "credential deleted");
        Ok(())
    }

    /// Verify the supplied master password against the stored hash.
    ///
    /// The PBKDF2 recomputation is CPU-bound and runs on the blocking pool.
    async fn authenticate(&self, master_password: &SecretString) -> Result<(), KeyrackError> {
        let stored = master::get_password_hash(&self.db)
            .await?
            .ok_or(KeyrackError::NotInitialized)?;

        let password = secret_bytes(master_password);
        let iterations = self.iterations;
        let valid = tokio::task::spawn_blocking(move || {
            kdf::verify_master_password(&password, &stored, iterations)
        })
        .await
        .map_err(map_join_err)?;

        if valid {
            Ok(())
        } else {
            Err(KeyrackError::Authentication)
        }
    }

    /// Re-derive the record encryption key from the master password and the
    /// persisted salt. The key is zeroized when the caller drops it.
    async fn derive_key(
        &self,
        master_password: &SecretString,
    ) -> Result<Zeroizing<[u8; kdf::KEY_LEN]>, KeyrackError> {
        let salt = settings::get_value(&self.db, ENCRYPTION_SALT_KEY)
            .await?
            .ok_or(KeyrackError::NotInitialized)?;

        let password = secret_bytes(master_password);
        let iterations = self.iterations;
        Ok(tokio::task::spawn_blocking(move || {
            kdf::derive_encryption_key(&password, &salt, iterations)
        })
        .await
        .map_err(map_join_err)?)
    }
}

fn duplicate_outcome(existing: keyrack_core::CredentialRecord) -> CreateOutcome {
    CreateOutcome::Duplicate {
        existing_id: existing.id,
        app_name: existing.app_name,
        username: existing.username,
        created_by: existing.created_by,
    }
}

/// Copy the master password into an owned buffer that is wiped on drop, for
/// handing to the blocking pool.
fn secret_bytes(master_password: &SecretString) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(master_password.expose_secret().as_bytes().to_vec())
}

fn map_join_err(e: tokio::task::JoinError) -> KeyrackError {
    KeyrackError::Crypto(format!("key derivation task failed: {e}"))
}
