//! Account store - encrypted account records with get-or-create lifecycle
//!
//! This is the store boundary where the field codec is applied: everything
//! below (the repository) sees only ciphertext and blind-index hashes,
//! everything above sees decrypted `Account` values. Accounts are created
//! lazily on first lookup, never deleted, and their balance is written only
//! through the credit/debit methods here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::adapters::duckdb::{AccountRow, DuckDbRepository};
use crate::domain::locale;
use crate::domain::result::{Error, Result};
use crate::domain::Account;
use crate::services::crypto::FieldCipher;

/// Durable, encrypted-at-rest account store
pub struct AccountStore {
    repository: Arc<DuckDbRepository>,
    cipher: FieldCipher,
}

impl AccountStore {
    pub fn new(repository: Arc<DuckDbRepository>, cipher: FieldCipher) -> Self {
        Self { repository, cipher }
    }

    /// Fetch the account for `external_id`, creating it on first sight.
    ///
    /// Idempotent: at most one account ever exists per distinct external id.
    /// Under concurrent calls the insert is an upsert-on-conflict, so one
    /// creation wins and every caller gets the winning row; a lost race is
    /// resolved by a single internal re-read and never surfaces as an error.
    pub fn get_or_create(&self, external_id: &str) -> Result<Account> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Err(Error::invalid_input("external id cannot be empty"));
        }

        let hash = self.cipher.lookup_hash(external_id);
        if let Some(row) = self.repository.get_account_by_hash(&hash)? {
            return self.decode_row(row);
        }

        let account = Account::new(Uuid::new_v4(), external_id);
        let row = AccountRow {
            account_id: account.id.to_string(),
            external_id_enc: self.cipher.encrypt_field(external_id)?,
            external_id_hash: hash.clone(),
            locale_enc: self.cipher.encrypt_field(&account.locale)?,
            balance: account.balance,
            created_at: account.created_at.to_rfc3339(),
            updated_at: account.updated_at.to_rfc3339(),
        };

        match self.repository.insert_account(&row) {
            Ok(true) => Ok(account),
            // Zero rows changed, or the constraint rejected us outright:
            // a concurrent caller won the creation race. Return its row.
            Ok(false) | Err(Error::DuplicateAccount(_)) => {
                let row = self.repository.get_account_by_hash(&hash)?.ok_or_else(|| {
                    Error::database("account vanished after losing creation race")
                })?;
                self.decode_row(row)
            }
            Err(e) => Err(e),
        }
    }

    /// Look up an account by surrogate key
    pub fn get(&self, account_id: Uuid) -> Result<Option<Account>> {
        match self.repository.get_account_by_id(&account_id.to_string())? {
            Some(row) => Ok(Some(self.decode_row(row)?)),
            None => Ok(None),
        }
    }

    /// Credit tokens to an account (called by the distribution collaborator
    /// after a confirmed external transfer)
    pub fn credit(&self, account_id: Uuid, amount: i64) -> Result<Account> {
        if amount <= 0 {
            return Err(Error::invalid_input("credit amount must be positive"));
        }

        let id = account_id.to_string();
        let changed = self
            .repository
            .credit_balance(&id, amount, &Utc::now().to_rfc3339())?;
        if !changed {
            return Err(Error::not_found(format!("account {}", account_id)));
        }
        self.fetch(account_id)
    }

    /// Debit tokens from an account. Guarded so the balance never goes
    /// negative: an overdraw is rejected and the record left unchanged.
    pub fn debit(&self, account_id: Uuid, amount: i64) -> Result<Account> {
        if amount <= 0 {
            return Err(Error::invalid_input("debit amount must be positive"));
        }

        let id = account_id.to_string();
        let changed = self
            .repository
            .debit_balance(&id, amount, &Utc::now().to_rfc3339())?;
        if !changed {
            // Distinguish a missing account from an insufficient balance
            return match self.repository.get_account_by_id(&id)? {
                Some(_) => Err(Error::invalid_input(format!(
                    "insufficient balance to debit {}",
                    amount
                ))),
                None => Err(Error::not_found(format!("account {}", account_id))),
            };
        }
        self.fetch(account_id)
    }

    /// Update an account's locale, validated against the supported set
    pub fn set_locale(&self, account_id: Uuid, new_locale: &str) -> Result<Account> {
        let tag = locale::normalize(new_locale);
        if !locale::is_supported(&tag) {
            return Err(Error::UnsupportedLocale(tag));
        }

        let locale_enc = self.cipher.encrypt_field(&tag)?;
        let changed = self.repository.update_locale(
            &account_id.to_string(),
            &locale_enc,
            &Utc::now().to_rfc3339(),
        )?;
        if !changed {
            return Err(Error::not_found(format!("account {}", account_id)));
        }
        self.fetch(account_id)
    }

    /// Total number of accounts
    pub fn count(&self) -> Result<i64> {
        self.repository.count_accounts()
    }

    fn fetch(&self, account_id: Uuid) -> Result<Account> {
        let row = self
            .repository
            .get_account_by_id(&account_id.to_string())?
            .ok_or_else(|| Error::not_found(format!("account {}", account_id)))?;
        self.decode_row(row)
    }

    /// Decrypt a stored row into the in-memory view
    fn decode_row(&self, row: AccountRow) -> Result<Account> {
        let id = Uuid::parse_str(&row.account_id)
            .map_err(|_| Error::database(format!("malformed account id: {}", row.account_id)))?;

        Ok(Account {
            id,
            external_id: self.cipher.decrypt_field(&row.external_id_enc)?,
            locale: self.cipher.decrypt_field(&row.locale_enc)?,
            balance: row.balance,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        })
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
