//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use trapnode::cli::Prompt;
use trapnode::config::{Flags, NodeConfig, Settings};
use trapnode::credentials::Terminal;
use trapnode::error::NodeResult;
use trapnode::process::{CommandOutcome, CommandRunner, CommandSpec, ToolPath};

/// Anvil's first development account.
pub const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Records commands instead of running them.
pub struct RecordingRunner {
    pub calls: RefCell<Vec<CommandSpec>>,
    pub followed: RefCell<Vec<CommandSpec>>,
    exit_codes: HashMap<String, i32>,
    tools: ToolPath,
}

impl RecordingRunner {
    pub fn new(bin_dir: &Path) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            followed: RefCell::new(Vec::new()),
            exit_codes: HashMap::new(),
            tools: ToolPath::from_dirs(vec![bin_dir.to_path_buf()]),
        }
    }

    /// Make every run of `program` exit with `code`.
    pub fn exit_code(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_string(), code);
        self
    }

    /// Masked display form of each recorded command.
    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> NodeResult<CommandOutcome> {
        self.calls.borrow_mut().push(spec.clone());
        Ok(CommandOutcome {
            command: spec.to_string(),
            status: Some(*self.exit_codes.get(spec.program()).unwrap_or(&0)),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }

    async fn follow(&self, spec: &CommandSpec) -> NodeResult<()> {
        self.followed.borrow_mut().push(spec.clone());
        Ok(())
    }

    fn tools(&self) -> &ToolPath {
        &self.tools
    }
}

/// Scripted terminal. Prompting a terminal with nothing scripted panics.
#[derive(Default)]
pub struct ScriptedTerminal {
    pub interactive: bool,
    pub piped: Option<String>,
    pub answers: VecDeque<String>,
    pub confirms: VecDeque<bool>,
    pub prompts: usize,
}

impl ScriptedTerminal {
    /// No TTY and nothing on stdin.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn interactive(answers: &[&str]) -> Self {
        Self {
            interactive: true,
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    fn next_answer(&mut self, prompt: &str) -> String {
        self.prompts += 1;
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt: {}", prompt))
    }
}

impl Terminal for ScriptedTerminal {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn read_piped_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.piped.take())
    }

    fn prompt_secret(&mut self, prompt: &str) -> NodeResult<String> {
        Ok(self.next_answer(prompt))
    }

    fn prompt_visible(&mut self, prompt: &str) -> NodeResult<String> {
        Ok(self.next_answer(prompt))
    }
}

impl Prompt for ScriptedTerminal {
    fn confirm(&mut self, prompt: &str, _default: bool) -> NodeResult<bool> {
        self.prompts += 1;
        Ok(self
            .confirms
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected confirmation: {}", prompt)))
    }

    fn input(&mut self, prompt: &str, _default: Option<&str>) -> NodeResult<String> {
        Ok(self.next_answer(prompt))
    }

    fn select(&mut self, prompt: &str, _items: &[String]) -> NodeResult<usize> {
        panic!("unexpected menu: {}", prompt)
    }
}

/// Temporary home for one test: project, operator, log and bin dirs.
pub struct Workspace {
    pub root: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("project")).unwrap();
        fs::create_dir_all(root.path().join("bin")).unwrap();
        Self { root }
    }

    pub fn project_dir(&self) -> PathBuf {
        self.root.path().join("project")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    pub fn project_config(&self) -> PathBuf {
        self.project_dir().join("drosera.toml")
    }

    /// Drop an executable stub named `name` into the bin dir.
    pub fn install_tool(&self, name: &str) {
        let path = self.bin_dir().join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn write_project_config(&self, content: &str) {
        fs::write(self.project_config(), content).unwrap();
    }

    pub fn read_project_config(&self) -> String {
        fs::read_to_string(self.project_config()).unwrap()
    }

    /// Config rooted in this workspace.
    pub fn config(&self) -> NodeConfig {
        let mut config = NodeConfig::default();
        let root = self.root.path();
        config.paths.log_dir = root.join("logs").to_string_lossy().into_owned();
        config.paths.project_dir = self.project_dir().to_string_lossy().into_owned();
        config.paths.operator_dir = root.join("operator").to_string_lossy().into_owned();
        config.tools.extra_path = Vec::new();
        config
    }

    pub fn settings(&self, config: NodeConfig, flags: Flags) -> Settings {
        Settings::new(config, flags)
    }
}

/// Flags for a scripted, non-interactive run with the test key.
pub fn automated_flags() -> Flags {
    Flags {
        private_key: Some(TEST_KEY.to_string()),
        non_interactive: true,
        assume_yes: true,
        ..Flags::default()
    }
}

pub const PROJECT_TOML: &str = r#"ethereum_rpc = "https://old.example"
drosera_rpc = "https://seed.old.example"
eth_chain_id = 1
drosera_address = "0x0000000000000000000000000000000000000001"

[traps]

[traps.mytrap]
path = "out/HelloWorldTrap.sol/HelloWorldTrap.json"
response_contract = "0xdA890040Af0533D98B9F5f8FE3537720ABf83B0C"
cooldown_period_blocks = 33

[traps.other]
path = "out/Other.sol/Other.json"
"#;
