//! Superuser bootstrap configuration and outcomes.
//!
//! The bootstrap command reads the desired admin credentials from the
//! environment. When either the username or the password is missing it
//! does nothing.

/// Primary environment variable names.
pub const ENV_USERNAME: &str = "SUPERUSER_USERNAME";
pub const ENV_PASSWORD: &str = "SUPERUSER_PASSWORD";
pub const ENV_EMAIL: &str = "SUPERUSER_EMAIL";

/// Names used by earlier deployments, read when the primary ones are unset.
pub const LEGACY_ENV_USERNAME: &str = "DJANGO_SUPERUSER_USERNAME";
pub const LEGACY_ENV_PASSWORD: &str = "DJANGO_SUPERUSER_PASSWORD";
pub const LEGACY_ENV_EMAIL: &str = "DJANGO_SUPERUSER_EMAIL";

/// Status line printed when the credentials are not configured.
pub const NOT_CONFIGURED_MESSAGE: &str = "Superuser env vars not set";

/// Desired superuser credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct SuperuserConfig {
    pub username: String,
    pub password: String,
    /// Empty when not configured.
    pub email: String,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for SuperuserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuperuserConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

impl SuperuserConfig {
    /// Load from the process environment.
    ///
    /// | Env Var              | Fallback                    | Required |
    /// |----------------------|-----------------------------|----------|
    /// | `SUPERUSER_USERNAME` | `DJANGO_SUPERUSER_USERNAME` | yes      |
    /// | `SUPERUSER_PASSWORD` | `DJANGO_SUPERUSER_PASSWORD` | yes      |
    /// | `SUPERUSER_EMAIL`    | `DJANGO_SUPERUSER_EMAIL`    | no       |
    ///
    /// Returns `None` when username or password is absent or empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let read = |primary: &str, legacy: &str| {
            lookup(primary)
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(legacy).filter(|v| !v.is_empty()))
        };

        let username = read(ENV_USERNAME, LEGACY_ENV_USERNAME)?;
        let password = read(ENV_PASSWORD, LEGACY_ENV_PASSWORD)?;
        let email = read(ENV_EMAIL, LEGACY_ENV_EMAIL).unwrap_or_default();

        Some(Self {
            username,
            password,
            email,
        })
    }
}

/// Result of a successful bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuperuserOutcome {
    Created,
    PasswordUpdated,
}

impl SuperuserOutcome {
    /// Status line printed by the bootstrap command.
    pub fn message(self) -> &'static str {
        match self {
            SuperuserOutcome::Created => "Superuser created",
            SuperuserOutcome::PasswordUpdated => "Superuser password updated",
        }
    }
}
