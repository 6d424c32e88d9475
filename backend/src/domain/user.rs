//! User account model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised when constructing user values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    MalformedEmail,
    EmailTooLong { max: usize },
    PasswordTooShort { min: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email must contain a local part and a domain"),
            Self::EmailTooLong { max } => {
                write!(f, "email must be at most {max} characters")
            }
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Maximum stored length for an email address.
pub const EMAIL_MAX: usize = 255;
/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 5;

/// Email address with the domain part normalised to lowercase.
///
/// ## Invariants
/// - Non-empty, at most [`EMAIL_MAX`] characters.
/// - Exactly one `@` separating non-empty local and domain parts.
/// - The domain part is lowercased on construction; the local part keeps its
///   original case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`], normalising the domain.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if raw.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }

        let (local, domain) = raw
            .split_once('@')
            .ok_or(UserValidationError::MalformedEmail)?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::MalformedEmail);
        }

        Ok(Self(format!("{local}@{}", domain.to_lowercase())))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user.
///
/// The `password_hash` field holds an Argon2 PHC string produced by
/// [`crate::domain::credentials::hash_password`]; plaintext passwords never
/// appear on this type.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: EmailAddress,
    pub display_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a regular account from validated parts.
    pub fn new(email: EmailAddress, display_name: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            display_name: display_name.into(),
            password_hash,
            is_active: true,
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    /// Create an account with elevated flags set.
    pub fn new_superuser(email: EmailAddress, password_hash: String) -> Self {
        let mut user = Self::new(email, String::new(), password_hash);
        user.is_staff = true;
        user
    }
}
