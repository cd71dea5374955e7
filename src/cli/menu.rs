//! Interactive menu and the non-interactive action list.

use crate::actions::{run_action, Action, Flow, Session};
use crate::cli::prompt::Prompt;
use crate::credentials::Terminal;
use crate::error::NodeResult;
use crate::process::CommandRunner;

/// Show the menu until the operator picks Exit.
///
/// A failed action is reported and the menu is shown again.
pub async fn run_menu<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let labels: Vec<String> = Action::MENU.iter().map(|a| a.label().to_string()).collect();

    loop {
        println!();
        let choice = session.terminal.select("What do you want to do?", &labels)?;
        let action = Action::MENU[choice];

        match run_action(session, action).await {
            Ok(Flow::Exit) => return Ok(()),
            Ok(Flow::Continue) => println!("✔ {}", action.label()),
            Err(e) => {
                tracing::error!(action = %action, error = %e, "Action failed");
                eprintln!("✘ {}: {}", action.label(), e);
            }
        }
    }
}

/// Run `actions` in order, stopping at the first failure.
pub async fn run_actions<R, T>(
    session: &mut Session<'_, R, T>,
    actions: &[Action],
) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    for &action in actions {
        match run_action(session, action).await? {
            Flow::Exit => break,
            Flow::Continue => println!("✔ {}", action.label()),
        }
    }
    Ok(())
}
