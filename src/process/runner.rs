//! Running external commands.
//!
//! Output is streamed to the terminal line by line while it is captured,
//! then appended to the action log for the command's category. Secrets
//! attached to the command are scrubbed before either happens.

use std::io;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};

use crate::error::{NodeError, NodeResult};
use crate::lifecycle::signals;
use crate::observability::action_log::ActionLog;
use crate::process::command::{CommandOutcome, CommandSpec};
use crate::process::deps::ToolPath;
use crate::process::redact::Redactor;

/// Executes [`CommandSpec`]s.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run to completion and capture output.
    async fn run(&self, spec: &CommandSpec) -> NodeResult<CommandOutcome>;

    /// Run attached to the terminal until it exits or the operator hits Ctrl-C.
    async fn follow(&self, spec: &CommandSpec) -> NodeResult<()>;

    /// Lookup path shared with the runner's children.
    fn tools(&self) -> &ToolPath;
}

/// Runner backed by real child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    log: ActionLog,
    tools: ToolPath,
    echo: bool,
}

impl SystemRunner {
    pub fn new(log: ActionLog, tools: ToolPath) -> Self {
        Self {
            log,
            tools,
            echo: true,
        }
    }

    /// Capture only; do not mirror child output to the terminal.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    fn command(&self, spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(spec.args.iter().map(|a| a.value()))
            .env("PATH", self.tools.joined())
            .kill_on_drop(true);
        for (key, value) in &spec.env {
            cmd.env(key, value.value());
        }
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn spawn(&self, spec: &CommandSpec, mut cmd: Command) -> NodeResult<Child> {
        tracing::info!(command = %spec, category = %spec.category, "Running");
        cmd.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => NodeError::MissingDependency {
                tool: spec.program.clone(),
            },
            _ => NodeError::Io(e),
        })
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> NodeResult<CommandOutcome> {
        let mut cmd = self.command(spec);
        cmd.stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if spec.stdin.is_some() { Stdio::piped() } else { Stdio::null() });

        let mut child = self.spawn(spec, cmd)?;
        let redactor = Redactor::new(spec.secrets());

        let feed = feed_stdin(child.stdin.take(), spec.stdin.as_deref());
        let echo = |stream| self.echo.then_some(stream);
        let out = collect_lines(child.stdout.take(), &redactor, echo(Stream::Stdout));
        let err = collect_lines(child.stderr.take(), &redactor, echo(Stream::Stderr));

        let (fed, stdout, stderr, status) = tokio::join!(feed, out, err, child.wait());
        if let Err(e) = fed {
            tracing::debug!(error = %e, "Child closed stdin early");
        }

        let outcome = CommandOutcome {
            command: spec.to_string(),
            status: status?.code(),
            stdout: stdout?,
            stderr: stderr?,
        };

        self.log.record(spec.category, &outcome);
        tracing::debug!(command = %outcome.command, status = ?outcome.status, "Finished");
        Ok(outcome)
    }

    async fn follow(&self, spec: &CommandSpec) -> NodeResult<()> {
        let mut cmd = self.command(spec);
        cmd.stdin(Stdio::null());

        let mut child = self.spawn(spec, cmd)?;
        self.log.note(spec.category, &format!("following `{}`", spec));

        tokio::select! {
            status = child.wait() => {
                let status = status?;
                let summary = format!("`{}` exited with {:?}", spec, status.code());
                self.log.note(spec.category, &summary);
                if !status.success() {
                    return Err(NodeError::SubprocessFailed {
                        command: spec.to_string(),
                        status: status.code(),
                    });
                }
            }
            _ = signals::interrupted() => {
                tracing::info!(command = %spec, "Interrupted; stopping");
                child.kill().await?;
                self.log.note(spec.category, &format!("stopped following `{}`", spec));
            }
        }

        Ok(())
    }

    fn tools(&self) -> &ToolPath {
        &self.tools
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

async fn feed_stdin<W>(stdin: Option<W>, input: Option<&str>) -> io::Result<()>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    if let (Some(mut stdin), Some(input)) = (stdin, input) {
        stdin.write_all(input.as_bytes()).await?;
        if !input.ends_with('\n') {
            stdin.write_all(b"\n").await?;
        }
        stdin.shutdown().await?;
    }
    Ok(())
}

async fn collect_lines<R>(
    reader: Option<R>,
    redactor: &Redactor<'_>,
    echo: Option<Stream>,
) -> io::Result<Vec<String>>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Vec::new();
    let Some(reader) = reader else {
        return Ok(captured);
    };

    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        let line = redactor.scrub(&line);
        match echo {
            Some(Stream::Stdout) => println!("{}", line),
            Some(Stream::Stderr) => eprintln!("{}", line),
            None => {}
        }
        captured.push(line);
    }
    Ok(captured)
}
