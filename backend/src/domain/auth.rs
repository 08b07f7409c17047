//! Authentication primitives such as login credentials and registrations.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Both share the email rule `local@domain.tld` with no whitespace; only
//! registration applies the password rules.

use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email was not of the form `local@domain.tld` or contained whitespace.
    #[error("email must look like name@domain.tld")]
    MalformedEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// New password contained whitespace.
    #[error("password must not contain spaces")]
    PasswordContainsWhitespace,
    /// New password was shorter than [`MIN_PASSWORD_CHARS`].
    #[error("password must be at least {MIN_PASSWORD_CHARS} characters long")]
    PasswordTooShort,
}

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_CHARS: usize = 5;

fn normalise_email(email: &str) -> Result<String, LoginValidationError> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(LoginValidationError::EmptyEmail);
    }
    if normalized.chars().any(char::is_whitespace) {
        return Err(LoginValidationError::MalformedEmail);
    }
    let Some((local, domain)) = normalized.split_once('@') else {
        return Err(LoginValidationError::MalformedEmail);
    };
    let dotted = domain
        .char_indices()
        .any(|(at, c)| c == '.' && at > 0 && at + 1 < domain.len());
    if local.is_empty() || domain.contains('@') || !dotted {
        return Err(LoginValidationError::MalformedEmail);
    }
    Ok(normalized)
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed, lowercased and has the shape `local@domain.tld`.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Admin@Example.com ", "password")
///     .expect("valid credentials");
/// assert_eq!(creds.email(), "admin@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = normalise_email(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated self-service sign-up.
///
/// ## Invariants
/// - `email` follows the same rules as [`LoginCredentials`].
/// - `password` has at least [`MIN_PASSWORD_CHARS`] characters and no
///   whitespace.
/// - `full_name` is trimmed; a blank name falls back to the email's local
///   part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: String,
    password: Zeroizing<String>,
    full_name: String,
}

impl Registration {
    /// Validate raw sign-up inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Self, LoginValidationError> {
        let email = normalise_email(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if password.chars().any(char::is_whitespace) {
            return Err(LoginValidationError::PasswordContainsWhitespace);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(LoginValidationError::PasswordTooShort);
        }
        let full_name = match full_name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => email.split('@').next().unwrap_or_default().to_owned(),
        };
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            full_name,
        })
    }

    /// Normalised email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Chosen password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Display name stored on the new profile.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }
}
