//! Generated credentials and the files that hold them.

use rand::Rng;

/// Alphabet for the Django secret key.
pub const SECRET_KEY_CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*(-_=+)";
pub const SECRET_KEY_LEN: usize = 50;

/// Alphabet for database passwords.
pub const DB_PASSWORD_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789#.,/?@+=";
pub const DB_PASSWORD_LEN: usize = 32;

/// Random string of `len` characters drawn from `alphabet`.
#[must_use]
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, alphabet: &str, len: usize) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    (0..len)
        .map(|_| chars[rng.random_range(0..chars.len())])
        .collect()
}

#[must_use]
pub fn secret_key<R: Rng + ?Sized>(rng: &mut R) -> String {
    random_string(rng, SECRET_KEY_CHARS, SECRET_KEY_LEN)
}

#[must_use]
pub fn db_password<R: Rng + ?Sized>(rng: &mut R) -> String {
    random_string(rng, DB_PASSWORD_CHARS, DB_PASSWORD_LEN)
}

/// Outgoing mail settings stored in `~/.smtp_config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
}

impl SmtpConfig {
    /// `host:port:user:password`
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}:{}:{}:{}", self.host, self.port, self.user, self.password)
    }
}

/// One line of a PostgreSQL password file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgPass {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl PgPass {
    /// `host:port:database:user:password`
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            self.host, self.port, self.database, self.user, self.password
        )
    }
}
