//! Prioritized private key resolution.
//!
//! Sources are tried in a fixed order and the first candidate that parses as a
//! [`Credential`] wins:
//!
//! 1. primary environment variable
//! 2. secondary environment variable
//! 3. `--private-key`
//! 4. first non-empty line of `--private-key-file`
//! 5. one line of piped stdin
//! 6. masked prompt, then one visible retry
//!
//! Invalid candidates are reported by source name only.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::credentials::key::Credential;
use crate::error::{NodeError, NodeResult};

/// Operator I/O used by the resolver.
///
/// Kept behind a trait so resolution order can be exercised without a real
/// terminal.
pub trait Terminal {
    /// Whether stdin is attached to a terminal.
    fn is_interactive(&self) -> bool;

    /// Read one line from non-terminal stdin. `None` on EOF.
    fn read_piped_line(&mut self) -> io::Result<Option<String>>;

    /// Prompt without echoing input.
    fn prompt_secret(&mut self, prompt: &str) -> NodeResult<String>;

    /// Prompt with visible input.
    fn prompt_visible(&mut self, prompt: &str) -> NodeResult<String>;
}

/// Where a credential candidate came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Env(String),
    Flag,
    File(PathBuf),
    Stdin,
    Prompt,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Env(name) => write!(f, "${}", name),
            CredentialSource::Flag => write!(f, "--private-key"),
            CredentialSource::File(path) => write!(f, "file {}", path.display()),
            CredentialSource::Stdin => write!(f, "stdin"),
            CredentialSource::Prompt => write!(f, "prompt"),
        }
    }
}

/// Candidate values gathered at startup, tried in priority order.
pub struct CredentialResolver {
    env: Vec<(String, Option<Zeroizing<String>>)>,
    flag: Option<Zeroizing<String>>,
    file: Option<PathBuf>,
    non_interactive: bool,
}

impl CredentialResolver {
    /// Capture the environment and flag candidates for this run.
    pub fn new<F>(settings: &Settings, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let names = &settings.config.credentials;
        let env = [&names.primary_env, &names.secondary_env]
            .into_iter()
            .map(|name| (name.clone(), lookup(name.as_str()).map(Zeroizing::new)))
            .collect();

        Self {
            env,
            flag: settings.flags.private_key.clone().map(Zeroizing::new),
            file: settings.flags.private_key_file.clone(),
            non_interactive: settings.flags.non_interactive,
        }
    }

    /// Resolve the key, prompting only when allowed and possible.
    pub fn resolve(&self, terminal: &mut dyn Terminal) -> NodeResult<Credential> {
        let mut checked = Vec::new();

        for (name, value) in &self.env {
            let source = CredentialSource::Env(name.clone());
            if let Some(credential) = accept(&source, value.as_deref().map(String::as_str)) {
                return Ok(credential);
            }
            checked.push(source);
        }

        let flag = self.flag.as_deref().map(String::as_str);
        if let Some(credential) = accept(&CredentialSource::Flag, flag) {
            return Ok(credential);
        }
        checked.push(CredentialSource::Flag);

        if let Some(path) = &self.file {
            let source = CredentialSource::File(path.clone());
            match first_non_empty_line(path) {
                Ok(line) => {
                    if let Some(credential) = accept(&source, line.as_deref().map(String::as_str)) {
                        return Ok(credential);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Cannot read private key file"
                    );
                }
            }
            checked.push(source);
        }

        if !terminal.is_interactive() {
            match terminal.read_piped_line() {
                Ok(line) => {
                    let line = line.map(Zeroizing::new);
                    let piped = line.as_deref().map(String::as_str);
                    if let Some(credential) = accept(&CredentialSource::Stdin, piped) {
                        return Ok(credential);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Cannot read private key from stdin"),
            }
            checked.push(CredentialSource::Stdin);
        }

        if self.non_interactive || !terminal.is_interactive() {
            return Err(NodeError::MissingCredential {
                checked: describe(&checked),
            });
        }

        self.prompt(terminal)
    }

    fn prompt(&self, terminal: &mut dyn Terminal) -> NodeResult<Credential> {
        let masked = Zeroizing::new(terminal.prompt_secret("Private key (64 hex characters)")?);
        match Credential::parse(&masked) {
            Ok(credential) => return Ok(credential),
            Err(_) => tracing::warn!(
                "Entered private key is not 64 hex characters; retrying with visible input"
            ),
        }

        let visible = Zeroizing::new(terminal.prompt_visible("Private key (visible)")?);
        let credential = Credential::parse(&visible)?;
        tracing::info!(source = %CredentialSource::Prompt, "Private key accepted");
        Ok(credential)
    }
}

fn accept(source: &CredentialSource, candidate: Option<&str>) -> Option<Credential> {
    let raw = candidate.filter(|v| !v.trim().is_empty())?;
    match Credential::parse(raw) {
        Ok(credential) => {
            tracing::info!(source = %source, "Private key accepted");
            Some(credential)
        }
        Err(_) => {
            tracing::warn!(source = %source, "Ignoring private key with invalid format");
            None
        }
    }
}

fn first_non_empty_line(path: &Path) -> io::Result<Option<Zeroizing<String>>> {
    let content = Zeroizing::new(fs::read_to_string(path)?);
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| Zeroizing::new(line.to_string()));
    Ok(line)
}

fn describe(sources: &[CredentialSource]) -> String {
    sources
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Flags, NodeConfig};
    use std::collections::VecDeque;

    const KEY_A: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const KEY_B: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    /// Scripted terminal that records what the resolver asked for.
    struct FakeTerminal {
        interactive: bool,
        piped: Option<String>,
        answers: VecDeque<String>,
        prompts: Vec<String>,
        stdin_reads: usize,
    }

    impl FakeTerminal {
        fn interactive(answers: &[&str]) -> Self {
            Self {
                interactive: true,
                piped: None,
                answers: answers.iter().map(|s| s.to_string()).collect(),
                prompts: Vec::new(),
                stdin_reads: 0,
            }
        }

        fn piped(line: Option<&str>) -> Self {
            Self {
                interactive: false,
                piped: line.map(str::to_string),
                ..Self::interactive(&[])
            }
        }
    }

    impl Terminal for FakeTerminal {
        fn is_interactive(&self) -> bool {
            self.interactive
        }

        fn read_piped_line(&mut self) -> io::Result<Option<String>> {
            self.stdin_reads += 1;
            Ok(self.piped.take())
        }

        fn prompt_secret(&mut self, prompt: &str) -> NodeResult<String> {
            self.prompts.push(format!("secret:{}", prompt));
            Ok(self.answers.pop_front().unwrap_or_default())
        }

        fn prompt_visible(&mut self, prompt: &str) -> NodeResult<String> {
            self.prompts.push(format!("visible:{}", prompt));
            Ok(self.answers.pop_front().unwrap_or_default())
        }
    }

    fn settings(flags: Flags) -> Settings {
        Settings::new(NodeConfig::default(), flags)
    }

    fn env<'a>(pairs: &'a [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_secondary_env_beats_flag() {
        let flags = Flags {
            private_key: Some(KEY_A.into()),
            ..Flags::default()
        };
        let resolver =
            CredentialResolver::new(&settings(flags), env(&[("ETH_PRIVATE_KEY", KEY_B)]));
        let mut term = FakeTerminal::interactive(&[]);

        let key = resolver.resolve(&mut term).unwrap();
        assert_eq!(key.expose(), KEY_B);
        assert!(term.prompts.is_empty());
    }

    #[test]
    fn test_primary_env_wins() {
        let resolver = CredentialResolver::new(
            &settings(Flags::default()),
            env(&[("DROSERA_PRIVATE_KEY", KEY_A), ("ETH_PRIVATE_KEY", KEY_B)]),
        );
        let key = resolver.resolve(&mut FakeTerminal::interactive(&[])).unwrap();
        assert_eq!(key.expose(), KEY_A);
    }

    #[test]
    fn test_invalid_env_falls_through_to_flag() {
        let flags = Flags {
            private_key: Some(format!("0x{}", KEY_A)),
            ..Flags::default()
        };
        let resolver = CredentialResolver::new(
            &settings(flags),
            env(&[("DROSERA_PRIVATE_KEY", "0xdeadbeef")]),
        );
        let key = resolver.resolve(&mut FakeTerminal::interactive(&[])).unwrap();
        assert_eq!(key.expose(), KEY_A);
    }

    #[test]
    fn test_file_first_non_empty_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        fs::write(&path, format!("\n   \n{}\n{}\n", KEY_B, KEY_A)).unwrap();

        let flags = Flags {
            private_key_file: Some(path),
            ..Flags::default()
        };
        let resolver = CredentialResolver::new(&settings(flags), env(&[]));
        let key = resolver.resolve(&mut FakeTerminal::interactive(&[])).unwrap();
        assert_eq!(key.expose(), KEY_B);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let flags = Flags {
            private_key_file: Some(PathBuf::from("/nonexistent/trapnode/key")),
            ..Flags::default()
        };
        let resolver = CredentialResolver::new(&settings(flags), env(&[]));
        let key = resolver.resolve(&mut FakeTerminal::piped(Some(KEY_A))).unwrap();
        assert_eq!(key.expose(), KEY_A);
    }

    #[test]
    fn test_piped_stdin_used_when_not_a_terminal() {
        let flags = Flags {
            non_interactive: true,
            ..Flags::default()
        };
        let resolver = CredentialResolver::new(&settings(flags), env(&[]));
        let mut term = FakeTerminal::piped(Some(format!("  {}  ", KEY_A).as_str()));
        assert_eq!(resolver.resolve(&mut term).unwrap().expose(), KEY_A);
        assert_eq!(term.stdin_reads, 1);
    }

    #[test]
    fn test_non_interactive_never_prompts() {
        let flags = Flags {
            non_interactive: true,
            ..Flags::default()
        };
        let resolver = CredentialResolver::new(&settings(flags), env(&[]));
        let mut term = FakeTerminal::interactive(&[KEY_A]);

        let err = resolver.resolve(&mut term).unwrap_err();
        assert!(matches!(err, NodeError::MissingCredential { .. }));
        assert!(term.prompts.is_empty());
        assert_eq!(term.stdin_reads, 0);
    }

    #[test]
    fn test_empty_pipe_without_terminal_is_missing() {
        let resolver = CredentialResolver::new(&settings(Flags::default()), env(&[]));
        let mut term = FakeTerminal::piped(None);
        let err = resolver.resolve(&mut term).unwrap_err();
        match err {
            NodeError::MissingCredential { checked } => {
                assert!(checked.contains("$DROSERA_PRIVATE_KEY"));
                assert!(checked.contains("stdin"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(term.prompts.is_empty());
    }

    #[test]
    fn test_prompt_retry_visible() {
        let resolver = CredentialResolver::new(&settings(Flags::default()), env(&[]));
        let mut term = FakeTerminal::interactive(&["not-a-key", KEY_A]);

        let key = resolver.resolve(&mut term).unwrap();
        assert_eq!(key.expose(), KEY_A);
        assert_eq!(term.prompts.len(), 2);
        assert!(term.prompts[0].starts_with("secret:"));
        assert!(term.prompts[1].starts_with("visible:"));
    }

    #[test]
    fn test_prompt_both_attempts_invalid() {
        let resolver = CredentialResolver::new(&settings(Flags::default()), env(&[]));
        let mut term = FakeTerminal::interactive(&["1234", "0xabc"]);

        let err = resolver.resolve(&mut term).unwrap_err();
        assert!(matches!(err, NodeError::InvalidCredentialFormat));
    }

    #[test]
    fn test_error_never_contains_candidate() {
        let bad = "ff".repeat(31);
        let flags = Flags {
            private_key: Some(bad.clone()),
            non_interactive: true,
            ..Flags::default()
        };
        let resolver = CredentialResolver::new(&settings(flags), env(&[]));
        let err = resolver.resolve(&mut FakeTerminal::interactive(&[])).unwrap_err();
        assert!(!err.to_string().contains(&bad));
    }
}
