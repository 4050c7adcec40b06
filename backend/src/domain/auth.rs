//! Authentication primitives: login credentials and signup requests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Raw passwords are held in [`Zeroizing`] buffers and never logged.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{UserValidationError, Username};

/// Minimum password length accepted at signup.
pub const PASSWORD_MIN_LEN: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "1234567890",
    "qwertyuiop",
    "iloveyou",
    "sunshine",
    "football",
    "baseball",
    "welcome1",
    "letmein1",
    "trustno1",
    "superman",
    "princess",
    "abc12345",
    "qwerty123",
    "passw0rd",
];

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use flashcards::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada", "correct horse").unwrap();
/// assert_eq!(creds.username(), "ada");
/// assert_eq!(creds.password(), "correct horse");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reasons a signup request is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupValidationError {
    /// The username failed [`Username`] validation.
    Username(UserValidationError),
    /// The password is shorter than [`PASSWORD_MIN_LEN`].
    PasswordTooShort { min: usize },
    /// The password consists only of digits.
    PasswordEntirelyNumeric,
    /// The password appears in the common-password list.
    PasswordTooCommon,
    /// The password matches the username.
    PasswordSimilarToUsername,
}

impl SignupValidationError {
    /// Request field the failure relates to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Username(_) => "username",
            _ => "password",
        }
    }

    /// Stable machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Username(_) => "invalid_username",
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::PasswordEntirelyNumeric => "password_entirely_numeric",
            Self::PasswordTooCommon => "password_too_common",
            Self::PasswordSimilarToUsername => "password_too_similar",
        }
    }
}

impl fmt::Display for SignupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(inner) => write!(f, "{inner}"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must contain at least {min} characters")
            }
            Self::PasswordEntirelyNumeric => write!(f, "password must not be entirely numeric"),
            Self::PasswordTooCommon => write!(f, "password is too common"),
            Self::PasswordSimilarToUsername => {
                write!(f, "password is too similar to the username")
            }
        }
    }
}

impl std::error::Error for SignupValidationError {}

/// Validated request to register a new account.
///
/// # Examples
/// ```
/// use flashcards::domain::{SignupRequest, SignupValidationError};
///
/// assert!(SignupRequest::try_from_parts("ada", "analytical-engine").is_ok());
/// assert_eq!(
///     SignupRequest::try_from_parts("ada", "31415926535").unwrap_err(),
///     SignupValidationError::PasswordEntirelyNumeric,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    username: Username,
    password: Zeroizing<String>,
}

impl SignupRequest {
    /// Validate a username and raw password against the signup policy.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, SignupValidationError> {
        let username =
            Username::new(username.trim()).map_err(SignupValidationError::Username)?;
        validate_password(&username, password)?;
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Raw password to be hashed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn validate_password(username: &Username, password: &str) -> Result<(), SignupValidationError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(SignupValidationError::PasswordTooShort {
            min: PASSWORD_MIN_LEN,
        });
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(SignupValidationError::PasswordEntirelyNumeric);
    }
    let lowered = Zeroizing::new(password.to_lowercase());
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Err(SignupValidationError::PasswordTooCommon);
    }
    if lowered.as_str() == username.as_ref().to_lowercase() {
        return Err(SignupValidationError::PasswordSimilarToUsername);
    }
    Ok(())
}
