//! Account domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::locale::DEFAULT_LOCALE;

/// One account per external messaging-platform identity.
///
/// This is the decrypted, in-memory view. At rest the `external_id` and
/// `locale` fields exist only as ciphertext (see `AccountStore`); the
/// plaintext never touches the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Process-assigned surrogate key, immutable
    pub id: Uuid,
    /// Identifier supplied by the messaging platform (e.g. a Telegram user id)
    pub external_id: String,
    /// Language tag, one of `locale::SUPPORTED_LOCALES`
    pub locale: String,
    /// Token balance, never negative
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with default locale and zero balance
    pub fn new(id: Uuid, external_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            external_id: external_id.into(),
            locale: DEFAULT_LOCALE.to_string(),
            balance: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate account data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.external_id.trim().is_empty() {
            return Err("external id cannot be empty");
        }
        if self.balance < 0 {
            return Err("balance cannot be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_defaults() {
        let account = Account::new(Uuid::new_v4(), "12345");
        assert_eq!(account.locale, "en");
        assert_eq!(account.balance, 0);
        assert!(account.validate().is_ok());
    }

    #[test]
    fn test_account_validation() {
        let mut account = Account::new(Uuid::new_v4(), "12345");
        account.external_id = "  ".to_string();
        assert!(account.validate().is_err());

        let mut account = Account::new(Uuid::new_v4(), "12345");
        account.balance = -1;
        assert!(account.validate().is_err());
    }
}
