//! DuckDB repository implementation
//!
//! The repository deals exclusively in `AccountRow` values - ciphertext and
//! blind-index columns, exactly as stored. Encryption and decryption happen
//! one layer up in `AccountStore`; this module never sees plaintext
//! identifiers or locales.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use duckdb::{params, Connection};

use crate::domain::result::{Error, Result};
use crate::services::MigrationService;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Map a DuckDB error to the library error type.
///
/// Unique-constraint violations become `DuplicateAccount` so the store can
/// run its race retry; everything else is a plain database error.
fn map_db_err(err: duckdb::Error) -> Error {
    let msg = err.to_string();
    let lower = msg.to_lowercase();
    if lower.contains("unique constraint") || lower.contains("duplicate key") {
        Error::DuplicateAccount(msg)
    } else {
        Error::Database(msg)
    }
}

/// Turn a single-row query result into an optional value, keeping genuine
/// database errors distinct from the no-rows case.
fn optional_row<T>(result: duckdb::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(map_db_err(e)),
    }
}

/// An account record exactly as persisted: ciphertext plus blind index.
#[derive(Debug, Clone)]
pub struct AccountRow {
    pub account_id: String,
    /// AES-256-GCM ciphertext of the external identifier
    pub external_id_enc: String,
    /// Keyed HMAC blind index, unique, used for equality lookup
    pub external_id_hash: String,
    /// AES-256-GCM ciphertext of the locale tag
    pub locale_enc: String,
    pub balance: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// DuckDB repository implementation
///
/// Every write is a single SQL statement, which DuckDB runs in its own
/// implicit transaction, so each store operation has exactly one commit
/// boundary. The in-process `Mutex` serializes callers sharing this handle;
/// the UNIQUE constraint on `external_id_hash` covers independent handles.
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Create a new DuckDB repository
    ///
    /// Includes retry logic with exponential backoff for file locking errors,
    /// which can occur when multiple handler instances open the database
    /// simultaneously.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[graphene] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Attempt to open a database connection (called by new() with retry logic)
    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default()
            .enable_autoload_extension(false)
            .map_err(map_db_err)?;
        let conn = Connection::open_with_flags(db_path, config).map_err(map_db_err)?;
        Ok(conn)
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let migration_service = MigrationService::new(&conn);
        migration_service.run_pending()?;
        Ok(())
    }

    /// Path of the backing database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // === Account operations ===

    /// Insert a new account row.
    ///
    /// Uses ON CONFLICT DO NOTHING on the blind-index uniqueness constraint:
    /// returns true if the row was inserted, false if another writer already
    /// created a row with the same external_id_hash. This is the atomic
    /// check-then-insert primitive that get-or-create builds on.
    pub fn insert_account(&self, row: &AccountRow) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "INSERT INTO accounts (account_id, external_id_enc, external_id_hash,
                                       locale_enc, balance, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT (external_id_hash) DO NOTHING",
                params![
                    row.account_id,
                    row.external_id_enc,
                    row.external_id_hash,
                    row.locale_enc,
                    row.balance,
                    row.created_at,
                    row.updated_at,
                ],
            )
            .map_err(map_db_err)?;
        Ok(changed > 0)
    }

    /// Look up an account by its blind-index hash
    pub fn get_account_by_hash(&self, external_id_hash: &str) -> Result<Option<AccountRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT account_id, external_id_enc, external_id_hash, locale_enc,
                        balance, created_at, updated_at
                 FROM accounts WHERE external_id_hash = ?",
            )
            .map_err(map_db_err)?;

        optional_row(stmt.query_row([external_id_hash], |row| Ok(Self::row_to_account(row))))
    }

    /// Look up an account by its surrogate key
    pub fn get_account_by_id(&self, account_id: &str) -> Result<Option<AccountRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT account_id, external_id_enc, external_id_hash, locale_enc,
                        balance, created_at, updated_at
                 FROM accounts WHERE account_id = ?",
            )
            .map_err(map_db_err)?;

        optional_row(stmt.query_row([account_id], |row| Ok(Self::row_to_account(row))))
    }

    /// Atomically add to an account balance. Returns true if a row changed.
    pub fn credit_balance(&self, account_id: &str, amount: i64, updated_at: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE accounts SET balance = balance + ?, updated_at = ?
                 WHERE account_id = ?",
                params![amount, updated_at, account_id],
            )
            .map_err(map_db_err)?;
        Ok(changed > 0)
    }

    /// Atomically subtract from an account balance, guarded in SQL so the
    /// balance can never go negative. Returns true if a row changed; false
    /// means the account is missing or has insufficient funds.
    pub fn debit_balance(&self, account_id: &str, amount: i64, updated_at: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE accounts SET balance = balance - ?, updated_at = ?
                 WHERE account_id = ? AND balance >= ?",
                params![amount, updated_at, account_id, amount],
            )
            .map_err(map_db_err)?;
        Ok(changed > 0)
    }

    /// Replace the stored locale ciphertext. Returns true if a row changed.
    pub fn update_locale(
        &self,
        account_id: &str,
        locale_enc: &str,
        updated_at: &str,
    ) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE accounts SET locale_enc = ?, updated_at = ? WHERE account_id = ?",
                params![locale_enc, updated_at, account_id],
            )
            .map_err(map_db_err)?;
        Ok(changed > 0)
    }

    /// Total number of account rows
    pub fn count_accounts(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
            .map_err(map_db_err)?;
        Ok(count)
    }

    fn row_to_account(row: &duckdb::Row) -> AccountRow {
        // Column indices from SELECT:
        // 0: account_id, 1: external_id_enc, 2: external_id_hash,
        // 3: locale_enc, 4: balance, 5: created_at, 6: updated_at
        AccountRow {
            account_id: row.get(0).unwrap_or_default(),
            external_id_enc: row.get(1).unwrap_or_default(),
            external_id_hash: row.get(2).unwrap_or_default(),
            locale_enc: row.get(3).unwrap_or_default(),
            balance: row.get(4).unwrap_or_default(),
            created_at: row.get(5).unwrap_or_default(),
            updated_at: row.get(6).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_row(suffix: &str) -> AccountRow {
        AccountRow {
            account_id: format!("id-{}", suffix),
            external_id_enc: format!("enc-{}", suffix),
            external_id_hash: format!("hash-{}", suffix),
            locale_enc: "enc-en".to_string(),
            balance: 0,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn open_repo(temp_dir: &TempDir) -> DuckDbRepository {
        let repo = DuckDbRepository::new(&temp_dir.path().join("test.duckdb")).unwrap();
        repo.ensure_schema().unwrap();
        repo
    }

    #[test]
    fn test_insert_and_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);

        assert!(repo.insert_account(&test_row("a")).unwrap());
        let row = repo.get_account_by_hash("hash-a").unwrap().unwrap();
        assert_eq!(row.account_id, "id-a");
        assert_eq!(row.balance, 0);

        assert!(repo.get_account_by_hash("hash-missing").unwrap().is_none());
    }

    #[test]
    fn test_conflicting_insert_is_a_noop() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);

        assert!(repo.insert_account(&test_row("a")).unwrap());

        // Same hash, different surrogate key: must not create a second row
        let mut dup = test_row("b");
        dup.external_id_hash = "hash-a".to_string();
        assert!(!repo.insert_account(&dup).unwrap());

        assert_eq!(repo.count_accounts().unwrap(), 1);
        let row = repo.get_account_by_hash("hash-a").unwrap().unwrap();
        assert_eq!(row.account_id, "id-a");
    }

    #[test]
    fn test_missing_row_is_none_but_failures_surface() {
        let temp_dir = TempDir::new().unwrap();

        // No schema yet: lookups must report the failure, not hide it as an
        // absent row
        let repo = DuckDbRepository::new(&temp_dir.path().join("test.duckdb")).unwrap();
        assert!(repo.get_account_by_hash("hash-a").is_err());
        assert!(repo.get_account_by_id("id-a").is_err());

        // With the schema in place, an absent row is a plain None
        repo.ensure_schema().unwrap();
        assert!(repo.get_account_by_hash("hash-a").unwrap().is_none());
        assert!(repo.get_account_by_id("id-a").unwrap().is_none());
    }

    #[test]
    fn test_debit_guard_blocks_overdraw() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);
        repo.insert_account(&test_row("a")).unwrap();

        let now = "2026-01-02T00:00:00+00:00";
        assert!(repo.credit_balance("id-a", 100, now).unwrap());
        assert!(!repo.debit_balance("id-a", 101, now).unwrap());
        assert!(repo.debit_balance("id-a", 100, now).unwrap());

        let row = repo.get_account_by_id("id-a").unwrap().unwrap();
        assert_eq!(row.balance, 0);
    }
}
