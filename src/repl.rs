//! Interactive session - rustyline-driven command loop
//!
//! Reads one command per line, dispatches it, prints the reply, repeats
//! until an exit verb. Falls back to a plain stdin line loop when stdin is
//! not a terminal, so sessions can be piped in.

use anyhow::Result;
use crossterm::{execute, style::{Color, Print, ResetColor, SetForegroundColor}};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::Helper;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::commands::recovery::Prompter;
use crate::commands::{dispatch, parse_input};
use crate::store::ContactStore;

/// Session verbs, for completion
const VERBS: &[&str] = &["hello", "add", "change", "phone", "all", "close", "exit"];

/// Argument hints shown after a completed verb
const VERB_HINTS: &[(&str, &str)] = &[
    ("add", " <name> <phone>"),
    ("change", " <name> <new-phone>"),
    ("phone", " <name>"),
];

/// Verbs matching a partial first token
fn verb_completions(partial: &str) -> Vec<&'static str> {
    VERBS
        .iter()
        .copied()
        .filter(|v| v.starts_with(partial) && *v != partial)
        .collect()
}

/// Hint for a fully-typed verb with no arguments yet
fn verb_hint(line: &str) -> Option<&'static str> {
    VERB_HINTS
        .iter()
        .find(|(verb, _)| *verb == line)
        .map(|(_, hint)| *hint)
}

/// Custom helper for autocomplete and hints
struct BookHelper;

impl Completer for BookHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let partial = &line[..pos];

        // Only the verb position completes; arguments are free text
        if partial.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let matches: Vec<Pair> = verb_completions(partial)
            .into_iter()
            .map(|v| Pair {
                display: v.to_string(),
                // Complete from current position
                replacement: v[partial.len()..].to_string(),
            })
            .collect();
        Ok((pos, matches))
    }
}

impl Hinter for BookHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if line.is_empty() || pos < line.len() {
            return None;
        }

        // Argument hint once the verb is typed
        if let Some(hint) = verb_hint(line) {
            return Some(hint.to_string());
        }

        // Verb hint - show the first matching completion
        if !line.contains(char::is_whitespace) {
            if let Some(verb) = verb_completions(line).first() {
                return Some(verb[line.len()..].to_string());
            }
        }

        None
    }
}

impl Validator for BookHelper {
    fn validate(&self, _ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Highlighter for BookHelper {}

impl Helper for BookHelper {}

/// Print colored output
fn print_colored(text: &str, color: Color) {
    let _ = execute!(
        io::stdout(),
        SetForegroundColor(color),
        Print(text),
        ResetColor
    );
}

/// Print a dimmed line
fn print_dim(text: &str) {
    print_colored(text, Color::DarkGrey);
}

/// Print an error message
fn print_error(text: &str) {
    print_colored(text, Color::Red);
}

/// Print the welcome banner
fn print_banner(store: &ContactStore) {
    let records = store.load_all().map(|c| c.len()).unwrap_or(0);

    println!();
    println!("  \x1b[1mWelcome to the assistant bot!\x1b[0m");
    println!();
    println!("  \x1b[90mstore\x1b[0m    {}", store.path().display());
    println!("  \x1b[90mrecords\x1b[0m  {}", records);
    println!();
    println!("  \x1b[90mhello · add <name> <phone> · change <name> <new-phone> · phone <name> · all · close/exit\x1b[0m");
    println!();
}

/// Recovery prompts answered through the line editor
struct EditorPrompter<'a> {
    editor: &'a mut rustyline::Editor<BookHelper, rustyline::history::DefaultHistory>,
}

impl Prompter for EditorPrompter<'_> {
    fn notify(&mut self, text: &str) {
        println!("{}", text);
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                Err(anyhow::anyhow!("dialog cancelled"))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Recovery prompts answered from a plain line source (piped stdin, tests)
pub struct LinePrompter<R: BufRead> {
    reader: R,
}

impl<R: BufRead> LinePrompter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the next command line; `None` at end of input
    pub fn next_command(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead> Prompter for LinePrompter<R> {
    fn notify(&mut self, text: &str) {
        println!("{}", text);
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        self.next_command()?
            .ok_or_else(|| anyhow::anyhow!("end of input during dialog"))
    }
}

/// Run the assistant session against `store`
pub fn run(store: &ContactStore) -> Result<()> {
    if !io::stdin().is_terminal() {
        return run_piped(store);
    }

    print_banner(store);

    // Setup rustyline with autocomplete and proper config
    let config = rustyline::Config::builder()
        .completion_type(rustyline::CompletionType::List)
        .edit_mode(rustyline::EditMode::Emacs)
        .auto_add_history(true)
        .build();

    let mut rl =
        rustyline::Editor::<BookHelper, rustyline::history::DefaultHistory>::with_config(config)?;
    rl.set_helper(Some(BookHelper));

    // Main loop with rustyline
    loop {
        let readline = rl.readline("\x1b[32m❯\x1b[0m ");

        match readline {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                let command = match parse_input(input) {
                    Ok(command) => command,
                    Err(_) => continue,
                };

                let mut prompter = EditorPrompter { editor: &mut rl };
                match dispatch(&command, store, &mut prompter) {
                    Ok(reply) => {
                        println!("{}", reply.text);
                        if reply.terminate {
                            break;
                        }
                    }
                    Err(e) => {
                        // Fatal for this command only - log and keep the session
                        tracing::error!("Command '{}' failed: {:#}", command.verb, e);
                        print_error(&format!("✗ {:#}", e));
                        println!();
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                print_dim("^C");
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Good bye!");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Line-at-a-time session for piped input
fn run_piped(store: &ContactStore) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = LinePrompter::new(stdin.lock());

    println!("Welcome to the assistant bot!");

    loop {
        let Some(line) = prompter.next_command()? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let command = match parse_input(input) {
            Ok(command) => command,
            Err(_) => continue,
        };

        match dispatch(&command, store, &mut prompter) {
            Ok(reply) => {
                println!("{}", reply.text);
                if reply.terminate {
                    break;
                }
            }
            Err(e) => {
                tracing::error!("Command '{}' failed: {:#}", command.verb, e);
                eprintln!("Error: {:#}", e);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_verb_completions_prefix() {
        assert_eq!(verb_completions("a"), vec!["add", "all"]);
        assert_eq!(verb_completions("ch"), vec!["change"]);
        assert_eq!(verb_completions("p"), vec!["phone"]);
        assert!(verb_completions("xyz").is_empty());
    }

    #[test]
    fn test_verb_completions_exact_match_excluded() {
        assert!(verb_completions("hello").is_empty());
    }

    #[test]
    fn test_verb_hint_arguments() {
        assert_eq!(verb_hint("add"), Some(" <name> <phone>"));
        assert_eq!(verb_hint("phone"), Some(" <name>"));
        assert_eq!(verb_hint("hello"), None);
    }

    #[test]
    fn test_line_prompter_reads_commands() {
        let mut prompter = LinePrompter::new(Cursor::new("add Ann 123\nexit\n"));
        assert_eq!(prompter.next_command().unwrap().unwrap(), "add Ann 123");
        assert_eq!(prompter.next_command().unwrap().unwrap(), "exit");
        assert!(prompter.next_command().unwrap().is_none());
    }

    #[test]
    fn test_line_prompter_dialog_eof() {
        let mut prompter = LinePrompter::new(Cursor::new(""));
        assert!(prompter.read_line("Yes/No ").is_err());
    }
}
