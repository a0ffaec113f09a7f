use std::fmt;
use std::io;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::report::Reporter;

/// Table and key the secrets store is queried under
pub const SECRET_NAMESPACE: &str = "general";
pub const SECRET_KEY: &str = "gemini_api_key";

pub const ENV_VAR: &str = "GEMINI_API_KEY";

/// Values shipped in templates and docs that mean "nobody filled this in"
const PLACEHOLDERS: &[&str] = &[
    "YOUR_API_KEY",
    "YOUR_GEMINI_API_KEY",
    "YOUR-API-KEY",
    "YOUR_API_KEY_HERE",
    "<GEMINI_API_KEY>",
    "<YOUR_API_KEY>",
    "CHANGEME",
];

fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    PLACEHOLDERS.iter().any(|p| p.eq_ignore_ascii_case(value))
}

/// An API key. `Debug` and `masked` never show more than a short prefix and suffix.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Credential(value.into().trim().to_string())
    }

    /// The raw secret, for building requests only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len().max(4));
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.masked())
    }
}

/// Outcome of asking one source for a key
#[derive(Debug)]
pub enum Attempt {
    Found(Credential),
    Missing,
    Placeholder,
    Failed(String),
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attempt::Found(c) => write!(f, "found {}", c.masked()),
            Attempt::Missing => write!(f, "not set"),
            Attempt::Placeholder => write!(f, "placeholder value"),
            Attempt::Failed(reason) => write!(f, "error: {reason}"),
        }
    }
}

pub trait CredentialSource {
    fn name(&self) -> &'static str;

    fn fetch(&mut self) -> Attempt;
}

/// Key baked in at build time via `YTSUM_EMBEDDED_GEMINI_API_KEY`
pub struct Embedded {
    value: Option<&'static str>,
}

impl Embedded {
    pub fn compiled() -> Self {
        Embedded {
            value: option_env!("YTSUM_EMBEDDED_GEMINI_API_KEY"),
        }
    }

    #[cfg(test)]
    fn with_value(value: &'static str) -> Self {
        Embedded { value: Some(value) }
    }
}

impl CredentialSource for Embedded {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn fetch(&mut self) -> Attempt {
        match self.value.map(str::trim) {
            None | Some("") => Attempt::Missing,
            Some(v) if is_placeholder(v) => Attempt::Placeholder,
            Some(v) => Attempt::Found(Credential::new(v)),
        }
    }
}

/// TOML secrets file, read as `[general] gemini_api_key = "..."`
pub struct SecretStore {
    path: PathBuf,
}

impl SecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SecretStore { path: path.into() }
    }
}

impl CredentialSource for SecretStore {
    fn name(&self) -> &'static str {
        "secrets store"
    }

    fn fetch(&mut self) -> Attempt {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No secrets file at {}", self.path.display());
                return Attempt::Missing;
            }
            Err(e) => return Attempt::Failed(format!("{}: {e}", self.path.display())),
        };

        let table: toml::Table = match toml::from_str(&content) {
            Ok(t) => t,
            Err(e) => return Attempt::Failed(format!("{}: {e}", self.path.display())),
        };

        let value = table
            .get(SECRET_NAMESPACE)
            .and_then(|ns| ns.get(SECRET_KEY))
            .and_then(|v| v.as_str())
            .map(str::trim);

        match value {
            None | Some("") => Attempt::Missing,
            Some(v) if is_placeholder(v) => Attempt::Placeholder,
            Some(v) => Attempt::Found(Credential::new(v)),
        }
    }
}

/// Process environment variable
pub struct Env {
    var: &'static str,
}

impl Env {
    pub fn new(var: &'static str) -> Self {
        Env { var }
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::new(ENV_VAR)
    }
}

impl CredentialSource for Env {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn fetch(&mut self) -> Attempt {
        match std::env::var(self.var) {
            Ok(v) if v.trim().is_empty() => Attempt::Missing,
            Ok(v) => Attempt::Found(Credential::new(v)),
            Err(std::env::VarError::NotPresent) => Attempt::Missing,
            Err(e) => Attempt::Failed(format!("{}: {e}", self.var)),
        }
    }
}

const PROMPT_LABEL: &str = "Gemini API key: ";

/// Ask the operator, with terminal echo off. Only put this in the chain when
/// input is a terminal.
pub struct Prompt {
    read: Box<dyn FnMut(&str) -> io::Result<String>>,
}

impl Prompt {
    pub fn terminal() -> Self {
        Prompt {
            read: Box::new(|label: &str| rpassword::prompt_password(label)),
        }
    }

    #[cfg(test)]
    fn from_bufread<R: io::BufRead + 'static>(mut input: R) -> Self {
        Prompt {
            read: Box::new(move |_: &str| rpassword::read_password_from_bufread(&mut input)),
        }
    }
}

impl CredentialSource for Prompt {
    fn name(&self) -> &'static str {
        "interactive"
    }

    fn fetch(&mut self) -> Attempt {
        match (self.read)(PROMPT_LABEL) {
            Ok(line) if line.trim().is_empty() => Attempt::Missing,
            Ok(line) => Attempt::Found(Credential::new(line)),
            Err(e) => Attempt::Failed(e.to_string()),
        }
    }
}

/// A key together with the name of the source that produced it
#[derive(Debug, Clone)]
pub struct Resolved {
    pub credential: Credential,
    pub source: &'static str,
}

/// Try each source in order and stop at the first usable key.
///
/// Every failed source is reported but is not fatal on its own. Only when the
/// whole chain is exhausted does this return `Error::Configuration`.
pub fn resolve(sources: Vec<Box<dyn CredentialSource>>, reporter: &mut impl Reporter) -> Result<Resolved> {
    let mut failures = Vec::new();

    for mut source in sources {
        let name = source.name();
        match source.fetch() {
            Attempt::Found(credential) => {
                info!("Using API key from {name}: {}", credential.masked());
                reporter.status(&format!("API key source: {name} ({})", credential.masked()));
                return Ok(Resolved {
                    credential,
                    source: name,
                });
            }
            attempt => {
                debug!("Credential source {name}: {attempt}");
                failures.push(format!("{name}: {attempt}"));
            }
        }
    }

    let summary = failures.join("; ");
    warn!("No API key found ({summary})");
    reporter.error(&format!(
        "An API key is required. Set {ENV_VAR} or add [{SECRET_NAMESPACE}] {SECRET_KEY} to the secrets file ({summary})"
    ));
    Err(Error::Configuration(summary))
}

/// The standard chain: embedded, secrets file, environment, then optionally the terminal.
pub fn default_chain(secrets_path: PathBuf, interactive: bool) -> Vec<Box<dyn CredentialSource>> {
    let mut chain: Vec<Box<dyn CredentialSource>> = vec![
        Box::new(Embedded::compiled()),
        Box::new(SecretStore::new(secrets_path)),
        Box::new(Env::default()),
    ];
    if interactive {
        chain.push(Box::new(Prompt::terminal()));
    }
    chain
}
