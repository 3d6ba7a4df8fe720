//! Port abstraction for resolving request credentials to a caller identity.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing the backing credential store.
//! HTTP handler tests stay deterministic because they can substitute a test
//! double instead of wiring a real identity backend.

use std::collections::HashMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::{Credentials, Error, Username};

/// Length in bytes of a SHA-256 password digest.
const DIGEST_LEN: usize = 32;

/// Domain use-case port for authentication.
///
/// Implementations must not reveal whether a username exists: every failed
/// authentication surfaces the same `unauthorized` error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate credentials and return the authenticated identity.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Username, Error>;
}

/// Compare two digests without early exit on the first differing byte.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let mut diff = 0_u8;
    for (a, b) in left.iter().zip(right.iter()) {
        diff |= *a ^ *b;
    }
    diff == 0
}

fn password_digest(password: &str) -> [u8; DIGEST_LEN] {
    Sha256::digest(password.as_bytes()).into()
}

/// In-memory identity provider holding a fixed set of registered identities.
///
/// Passwords are stored only as SHA-256 digests; authentication hashes the
/// presented password and compares digests in constant time. Unknown
/// usernames run the same comparison against a dummy digest so the failure
/// path does comparable work either way.
///
/// # Examples
/// ```
/// use backend::domain::ports::InMemoryIdentityProvider;
///
/// let provider = InMemoryIdentityProvider::new().with_user("user1", "password1");
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryIdentityProvider {
    users: HashMap<String, [u8; DIGEST_LEN]>,
}

impl InMemoryIdentityProvider {
    /// Create an empty provider; register identities with the builder methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider pre-loaded with the development fixture users
    /// `user1`/`password1` and `user2`/`password2`.
    #[must_use]
    pub fn fixture() -> Self {
        Self::new()
            .with_user("user1", "password1")
            .with_user("user2", "password2")
    }

    /// Register an identity, hashing the plaintext password immediately.
    #[must_use]
    pub fn with_user(mut self, username: impl Into<String>, password: &str) -> Self {
        self.users.insert(username.into(), password_digest(password));
        self
    }

    /// Register an identity from a hex-encoded SHA-256 password digest, for
    /// deployments that provision credentials without plaintext.
    pub fn with_password_digest(
        mut self,
        username: impl Into<String>,
        digest_hex: &str,
    ) -> Result<Self, Error> {
        let bytes = hex::decode(digest_hex).map_err(|err| {
            Error::invalid_request(format!("password digest must be hex encoded: {err}"))
        })?;
        let digest: [u8; DIGEST_LEN] = bytes.try_into().map_err(|_| {
            Error::invalid_request(format!(
                "password digest must be {DIGEST_LEN} bytes of hex"
            ))
        })?;
        self.users.insert(username.into(), digest);
        Ok(self)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Username, Error> {
        const DUMMY_DIGEST: [u8; DIGEST_LEN] = [0; DIGEST_LEN];

        let provided = password_digest(credentials.password());
        let registered = self.users.get(credentials.username());
        let reference = registered.copied().unwrap_or(DUMMY_DIGEST);
        // Compare unconditionally so unknown usernames do the same work as
        // known ones before the lookup outcome is consulted.
        let matches = constant_time_eq(&provided, &reference);

        if registered.is_some() && matches {
            Username::new(credentials.username())
                .map_err(|err| Error::internal(format!("invalid registered username: {err}")))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
