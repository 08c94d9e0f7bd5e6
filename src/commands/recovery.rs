//! Error recovery for failed commands
//!
//! Maps every `CommandError` to a user-facing reply - the mapping is an
//! explicit, exhaustive match, not ambient interception. A lookup miss is
//! the one failure treated as correctable: the supervisor walks an
//! interactive dialog that can synthesize an `add` for the missing name.

use anyhow::Result;
use tracing::debug;

use super::{add_contact, CommandError};
use crate::store::{ContactStore, StoreError};

/// Blocking line-oriented prompt source for the recovery dialog
///
/// The interactive session backs this with the rustyline editor; the piped
/// session reads stdin; tests feed a script.
pub trait Prompter {
    /// Show a notice that needs no answer
    fn notify(&mut self, text: &str);

    /// Show a prompt and block for one line of input
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Map a handler result to the reply text for the session
///
/// Advisory failures become fixed messages, a lookup miss enters the
/// recovery dialog, and store corruption or I/O failures propagate so the
/// caller aborts only the current command.
pub fn classify(
    result: Result<String, CommandError>,
    store: &ContactStore,
    prompter: &mut dyn Prompter,
) -> Result<String> {
    match result {
        Ok(reply) => Ok(reply),
        Err(CommandError::WrongArgumentCount) => Ok("Give me name and phone please.".to_string()),
        Err(CommandError::MissingNameArgument) => {
            Ok("You need to enter the contact's name".to_string())
        }
        Err(CommandError::EmptyCommand) => Ok("Invalid command.".to_string()),
        Err(CommandError::Store(StoreError::ContactNotFound(name))) => {
            recover_missing_contact(&name, store, prompter)
        }
        Err(CommandError::Store(err)) => Err(err.into()),
    }
}

/// Dialog position after the lookup miss has been announced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    PromptConfirm,
    PromptPhone,
}

/// Offer to create the missing contact in-session
///
/// Walks `PromptConfirm → {PromptPhone → add, decline}`, looping on the
/// confirm prompt until the answer starts with `Y` or `N`. The dialog
/// blocks the session; no other command runs until it resolves.
fn recover_missing_contact(
    name: &str,
    store: &ContactStore,
    prompter: &mut dyn Prompter,
) -> Result<String> {
    prompter.notify(&format!(
        "The contact '{}' does not exist in your list",
        name
    ));

    let mut step = Step::PromptConfirm;
    loop {
        match step {
            Step::PromptConfirm => {
                let answer = prompter.read_line("Would you like to add a contact? Yes/No ")?;
                match answer.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
                    Some('Y') => step = Step::PromptPhone,
                    Some('N') => return Ok("As you say".to_string()),
                    _ => debug!("Unrecognized answer {:?}, asking again", answer),
                }
            }
            Step::PromptPhone => {
                let number = prompter.read_line(&format!("enter {} contact number ", name))?;
                let args = [name.to_string(), number.trim().to_string()];
                return match add_contact(&args, store) {
                    Ok(reply) => Ok(reply),
                    Err(CommandError::Store(err)) => Err(err.into()),
                    // Two arguments are always supplied, shape errors can't occur
                    Err(other) => Err(anyhow::anyhow!(other)),
                };
            }
        }
    }
}
