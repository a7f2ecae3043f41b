//! User name and password for the deposition API.

use std::io::{BufRead, Write};

use crate::error::PreconditionError;

/// Basic-auth credentials for one request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Supplies a user name and password, never empty.
pub trait CredentialProvider {
    fn username(&mut self) -> Result<String, PreconditionError>;

    fn password(&mut self) -> Result<String, PreconditionError>;

    /// Collect both values.
    fn credentials(&mut self) -> Result<Credentials, PreconditionError> {
        Ok(Credentials {
            username: self.username()?,
            password: self.password()?,
        })
    }
}

/// Credentials fixed up front, as used by the plugin entry point.
#[derive(Debug, Clone)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self(Credentials {
            username: username.into(),
            password: password.into(),
        })
    }
}

impl CredentialProvider for StaticCredentials {
    fn username(&mut self) -> Result<String, PreconditionError> {
        non_empty(&self.0.username)
    }

    fn password(&mut self) -> Result<String, PreconditionError> {
        non_empty(&self.0.password)
    }
}

fn non_empty(value: &str) -> Result<String, PreconditionError> {
    if value.is_empty() {
        Err(PreconditionError::MissingCredentials)
    } else {
        Ok(value.to_string())
    }
}

/// Credentials taken from the command line, asking on `input` for any
/// value that was not given.
///
/// A prompted value is remembered, so each is asked for at most once.
pub struct PromptCredentials<R, W> {
    username: Option<String>,
    password: Option<String>,
    input: R,
    output: W,
}

impl PromptCredentials<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on the terminal.
    pub fn stdin(username: Option<String>, password: Option<String>) -> Self {
        Self::new(username, password, std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptCredentials<R, W> {
    pub fn new(username: Option<String>, password: Option<String>, input: R, output: W) -> Self {
        Self {
            username: username.filter(|u| !u.is_empty()),
            password: password.filter(|p| !p.is_empty()),
            input,
            output,
        }
    }

    /// Ask until a non-empty line is entered.
    ///
    /// End of input fails with `MissingCredentials`.
    fn prompt(&mut self, text: &str) -> Result<String, PreconditionError> {
        loop {
            write!(self.output, "{}", text)
                .and_then(|()| self.output.flush())
                .map_err(|_| PreconditionError::MissingCredentials)?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|_| PreconditionError::MissingCredentials)?;
            if read == 0 {
                return Err(PreconditionError::MissingCredentials);
            }
            let value = line.trim_end_matches(['\r', '\n']);
            if !value.is_empty() {
                return Ok(value.to_string());
            }
        }
    }
}

impl<R: BufRead, W: Write> CredentialProvider for PromptCredentials<R, W> {
    fn username(&mut self) -> Result<String, PreconditionError> {
        if let Some(username) = &self.username {
            return Ok(username.clone());
        }
        let username = self.prompt("FunPDBe user name: ")?;
        self.username = Some(username.clone());
        Ok(username)
    }

    fn password(&mut self) -> Result<String, PreconditionError> {
        if let Some(password) = &self.password {
            return Ok(password.clone());
        }
        let password = self.prompt("FunPDBe password: ")?;
        self.password = Some(password.clone());
        Ok(password)
    }
}
