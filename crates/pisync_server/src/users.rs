//! Dashboard accounts: password hashing and the user directory.

use crate::error::{ServerError, ServerResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Hashes and verifies passwords.
pub trait PasswordService: Send + Sync {
    /// Hashes a password into a self-describing string.
    fn hash_password(&self, password: &str) -> ServerResult<String>;

    /// Checks a password against a hash produced by [`hash_password`](Self::hash_password).
    fn verify_password(&self, password: &str, hash: &str) -> ServerResult<bool>;
}

/// Argon2-based [`PasswordService`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordService;

impl Argon2PasswordService {
    /// Creates the service with default Argon2 parameters.
    pub fn new() -> Self {
        Self
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash_password(&self, password: &str) -> ServerResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServerError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> ServerResult<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| ServerError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Numeric id, assigned in registration order starting at 1.
    pub id: u64,
    /// Unique username.
    pub username: String,
    /// Password hash.
    pub password_hash: String,
}

struct Accounts {
    by_name: HashMap<String, User>,
    next_id: u64,
}

/// In-memory account directory.
pub struct UserDirectory {
    passwords: Arc<dyn PasswordService>,
    accounts: RwLock<Accounts>,
}

impl UserDirectory {
    /// Creates an empty directory.
    pub fn new(passwords: Arc<dyn PasswordService>) -> Self {
        Self {
            passwords,
            accounts: RwLock::new(Accounts {
                by_name: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Creates a directory holding the given `(username, password)` pairs.
    pub fn with_accounts(
        passwords: Arc<dyn PasswordService>,
        accounts: &[(&str, &str)],
    ) -> ServerResult<Self> {
        let directory = Self::new(passwords);
        for (username, password) in accounts {
            directory.register(username, password)?;
        }
        Ok(directory)
    }

    /// Registers a new account.
    ///
    /// Fails with [`ServerError::InvalidRequest`] when either field is empty
    /// and with [`ServerError::UsernameTaken`] when the name is in use.
    pub fn register(&self, username: &str, password: &str) -> ServerResult<User> {
        if username.is_empty() || password.is_empty() {
            return Err(ServerError::InvalidRequest(
                "Username and password are required".into(),
            ));
        }
        if self.accounts.read().by_name.contains_key(username) {
            return Err(ServerError::UsernameTaken(username.to_string()));
        }

        // Hash outside the lock; the name is checked again before insert.
        let password_hash = self.passwords.hash_password(password)?;

        let mut accounts = self.accounts.write();
        if accounts.by_name.contains_key(username) {
            return Err(ServerError::UsernameTaken(username.to_string()));
        }
        let user = User {
            id: accounts.next_id,
            username: username.to_string(),
            password_hash,
        };
        accounts.next_id += 1;
        accounts.by_name.insert(user.username.clone(), user.clone());

        info!(user_id = user.id, username = %user.username, "registered user");
        Ok(user)
    }

    /// Verifies credentials, returning the account on success.
    ///
    /// Unknown users and wrong passwords fail the same way.
    pub fn login(&self, username: &str, password: &str) -> ServerResult<User> {
        let user = self
            .find(username)
            .ok_or_else(|| invalid_credentials(username))?;

        if self.passwords.verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(invalid_credentials(username))
        }
    }

    /// Looks up an account by name.
    pub fn find(&self, username: &str) -> Option<User> {
        self.accounts.read().by_name.get(username).cloned()
    }

    /// Returns the number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.read().by_name.len()
    }

    /// Returns true if there are no accounts.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn invalid_credentials(username: &str) -> ServerError {
    tracing::warn!(%username, "failed login");
    ServerError::AuthenticationFailed("Invalid username or password.".into())
}
