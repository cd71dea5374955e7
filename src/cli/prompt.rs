//! Terminal prompts backed by dialoguer.

use std::io::{self, BufRead, IsTerminal};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};

use crate::credentials::Terminal;
use crate::error::NodeResult;

/// Operator prompts used by actions.
pub trait Prompt {
    fn confirm(&mut self, prompt: &str, default: bool) -> NodeResult<bool>;

    /// Free-text input; `default` is returned when the operator just hits Enter.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> NodeResult<String>;

    /// Index of the chosen item.
    fn select(&mut self, prompt: &str, items: &[String]) -> NodeResult<usize>;
}

/// The real terminal.
pub struct DialoguerTerminal {
    theme: ColorfulTheme,
}

impl DialoguerTerminal {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for DialoguerTerminal {
    fn is_interactive(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn read_piped_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }

    fn prompt_secret(&mut self, prompt: &str) -> NodeResult<String> {
        Ok(Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?)
    }

    fn prompt_visible(&mut self, prompt: &str) -> NodeResult<String> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }
}

impl Prompt for DialoguerTerminal {
    fn confirm(&mut self, prompt: &str, default: bool) -> NodeResult<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> NodeResult<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?.trim().to_string())
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> NodeResult<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?)
    }
}
