//! Description of one external command and its result.

use std::fmt;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::error::{NodeError, NodeResult};
use crate::observability::action_log::LogCategory;

/// A command-line argument; secret ones are masked wherever the command is shown.
#[derive(Clone)]
pub enum Arg {
    Plain(String),
    Secret(Zeroizing<String>),
}

impl Arg {
    pub fn value(&self) -> &str {
        match self {
            Arg::Plain(s) => s,
            Arg::Secret(s) => s,
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Plain(s) => write!(f, "{:?}", s),
            Arg::Secret(_) => f.write_str("****"),
        }
    }
}

/// Builder for an external command.
#[derive(Clone, Debug)]
pub struct CommandSpec {
    pub(crate) category: LogCategory,
    pub(crate) program: String,
    pub(crate) args: Vec<Arg>,
    pub(crate) env: Vec<(String, Arg)>,
    pub(crate) cwd: Option<PathBuf>,
    pub(crate) stdin: Option<String>,
}

impl CommandSpec {
    pub fn new(category: LogCategory, program: impl Into<String>) -> Self {
        Self {
            category,
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
            stdin: None,
        }
    }

    /// `sh -c <script>`, used for vendor installer one-liners.
    pub fn shell(category: LogCategory, script: impl Into<String>) -> Self {
        Self::new(category, "sh").arg("-c").arg(script)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Plain(arg.into()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|a| Arg::Plain(a.into())));
        self
    }

    /// Argument that must never appear in logs or echoed output.
    pub fn secret_arg(mut self, arg: &str) -> Self {
        self.args.push(Arg::Secret(Zeroizing::new(arg.to_string())));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), Arg::Plain(value.into())));
        self
    }

    /// Environment variable whose value is scrubbed from captured output.
    pub fn secret_env(mut self, key: impl Into<String>, value: &str) -> Self {
        self.env
            .push((key.into(), Arg::Secret(Zeroizing::new(value.to_string()))));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Text written to the child's stdin, then stdin is closed.
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn category(&self) -> LogCategory {
        self.category
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Unmasked value of an environment variable set on the command.
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env.iter().find(|(k, _)| k == key).map(|(_, v)| v.value())
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn input(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    /// Every secret value attached to this command.
    pub fn secrets(&self) -> Vec<&str> {
        self.args
            .iter()
            .chain(self.env.iter().map(|(_, v)| v))
            .filter_map(|a| match a {
                Arg::Secret(s) if !s.is_empty() => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            match arg {
                Arg::Plain(s) if s.contains(' ') => write!(f, " '{}'", s)?,
                Arg::Plain(s) => write!(f, " {}", s)?,
                Arg::Secret(_) => f.write_str(" ****")?,
            }
        }
        Ok(())
    }
}

/// Exit status and captured (already scrubbed) output of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Display form of the command, secrets masked.
    pub command: String,
    /// `None` when the child was killed by a signal.
    pub status: Option<i32>,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Turn a non-zero exit into `SubprocessFailed`.
    pub fn require(self) -> NodeResult<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(NodeError::SubprocessFailed {
                command: self.command,
                status: self.status,
            })
        }
    }

    /// Log a non-zero exit as a warning and carry on. Returns `success()`.
    pub fn warn_on_failure(&self) -> bool {
        if !self.success() {
            tracing::warn!(
                command = %self.command,
                status = ?self.status,
                "Command failed; continuing"
            );
        }
        self.success()
    }

    /// First non-empty stdout line, trimmed.
    pub fn first_line(&self) -> Option<&str> {
        self.stdout.iter().map(|l| l.trim()).find(|l| !l.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_masks_secrets() {
        let spec = CommandSpec::new(LogCategory::Operator, "drosera-operator")
            .arg("register")
            .arg("--eth-private-key")
            .secret_arg("deadbeef")
            .secret_env("ETH_PRIVATE_KEY", "cafebabe");

        assert_eq!(
            spec.to_string(),
            "drosera-operator register --eth-private-key ****"
        );
        assert!(!format!("{:?}", spec).contains("deadbeef"));
        assert!(!format!("{:?}", spec).contains("cafebabe"));
        assert_eq!(spec.secrets(), vec!["deadbeef", "cafebabe"]);
    }

    #[test]
    fn test_shell_quotes_script() {
        let spec = CommandSpec::shell(LogCategory::Install, "curl -L x | bash");
        assert_eq!(spec.to_string(), "sh -c 'curl -L x | bash'");
    }

    #[test]
    fn test_require() {
        let ok = CommandOutcome {
            command: "true".into(),
            status: Some(0),
            stdout: vec![],
            stderr: vec![],
        };
        assert!(ok.clone().require().is_ok());

        let failed = CommandOutcome {
            status: Some(1),
            ..ok
        };
        assert!(!failed.warn_on_failure());
        match failed.require() {
            Err(NodeError::SubprocessFailed { command, status }) => {
                assert_eq!(command, "true");
                assert_eq!(status, Some(1));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
