use crate::error::{Result, RotamailError};
use crate::io;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Subject template with two `%s` slots, filled with the two reviewers.
    pub subject: String,
    /// Bare sender identifier; `domain` is appended.
    pub sender: String,
    pub domain: String,
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_smtp_timeout_secs")]
    pub smtp_timeout_secs: u64,
    #[serde(rename = "recepients", alias = "recipients", default)]
    pub recipients: Vec<String>,
    pub team1_users: PathBuf,
    pub team2_users: PathBuf,
    pub body_file_path: PathBuf,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Read the config at `path`. `.json` files are parsed as JSON, anything
    /// else as YAML. Relative file paths inside are resolved against the
    /// config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            RotamailError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut cfg = Self::parse(&data, is_json(path))
            .map_err(|msg| RotamailError::Config(format!("{}: {msg}", path.display())))?;
        if let Some(base) = path.parent() {
            cfg.resolve_paths(base);
        }
        Ok(cfg)
    }

    fn parse(data: &str, json: bool) -> std::result::Result<Self, String> {
        if json {
            serde_json::from_str(data).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(data).map_err(|e| e.to_string())
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        for p in [
            &mut self.team1_users,
            &mut self.team2_users,
            &mut self.body_file_path,
        ] {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    pub fn sender_address(&self) -> String {
        address(&self.sender, &self.domain)
    }

    pub fn recipient_addresses(&self) -> Vec<String> {
        self.recipients
            .iter()
            .map(|r| address(r, &self.domain))
            .collect()
    }

    pub fn address_of(&self, user: &str) -> String {
        address(user, &self.domain)
    }

    pub fn read_body(&self) -> Result<String> {
        io::read_to_string(&self.body_file_path)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut error = |message: String| {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message,
            });
        };

        let slots = subject_slots(&self.subject);
        if slots != 2 {
            error(format!(
                "subject must contain exactly two %s slots, found {slots}"
            ));
        }

        for (field, value) in [
            ("sender", &self.sender),
            ("domain", &self.domain),
            ("smtpHost", &self.smtp_host),
        ] {
            if value.trim().is_empty() {
                error(format!("{field} must not be empty"));
            }
        }

        if !is_bare_identifier(&self.sender) && !self.sender.trim().is_empty() {
            error(format!(
                "sender '{}' must be a bare identifier without '@' or whitespace",
                self.sender
            ));
        }
        for r in &self.recipients {
            if !is_bare_identifier(r) {
                error(format!(
                    "recipient '{r}' must be a bare identifier without '@' or whitespace"
                ));
            }
        }

        if same_file(&self.team1_users, &self.team2_users) {
            error(format!(
                "team1Users and team2Users both point at {}",
                self.team1_users.display()
            ));
        }

        if self.recipients.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "recepients is empty; mail goes to the Cc reviewers only".to_string(),
            });
        }

        warnings
    }

    /// Run [`Config::validate`] and fail on the first error-level finding.
    /// Returns the remaining warnings.
    pub fn check(&self) -> Result<Vec<ConfigWarning>> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self
            .validate()
            .into_iter()
            .partition(|w| w.level == WarnLevel::Error);
        match errors.into_iter().next() {
            Some(e) => Err(RotamailError::Config(e.message)),
            None => Ok(warnings),
        }
    }
}

/// `alice` + `example.com` → `alice@example.com`.
pub fn address(user: &str, domain: &str) -> String {
    format!("{user}@{domain}")
}

/// Count `%s` slots, skipping escaped `%%`.
pub fn subject_slots(template: &str) -> usize {
    let mut count = 0;
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c == '%' && chars.next() == Some('s') {
            count += 1;
        }
    }
    count
}

/// Non-empty, no `@`, no whitespace: safe to turn into `<id>@<domain>`.
pub fn is_bare_identifier(s: &str) -> bool {
    !s.is_empty() && !s.contains('@') && !s.chars().any(char::is_whitespace)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
