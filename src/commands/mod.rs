//! Command parsing and dispatch for the assistant session
//!
//! A command line is a verb plus whitespace-separated arguments. Handlers
//! return `Result<String, CommandError>`; the recovery module maps failures
//! to user-facing replies.

pub mod recovery;

use thiserror::Error;

use crate::store::{ContactStore, StoreError};

/// Reply for read commands that reach a store nobody has written to yet
const NO_CONTACTS_YET: &str = "You haven't added any contacts yet!";

/// Table border for the `all` listing
const TABLE_BORDER: &str = "-------------------------";

/// Failure taxonomy for a single command
#[derive(Debug, Error)]
pub enum CommandError {
    /// Too few or too many positional arguments for the operation
    #[error("wrong number of arguments")]
    WrongArgumentCount,
    /// No arguments where a contact name was required
    #[error("missing contact name")]
    MissingNameArgument,
    /// Nothing to route - the input was empty after trimming
    #[error("empty command")]
    EmptyCommand,
    /// A store-level failure (lookup miss, corrupt line, I/O)
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// First token, lower-cased
    pub verb: String,
    /// Remaining tokens, order preserved
    pub args: Vec<String>,
}

/// Outcome of one dispatched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Text to print verbatim
    pub text: String,
    /// Whether the session should stop after printing
    pub terminate: bool,
}

impl Reply {
    fn message(text: impl Into<String>) -> Self {
        Self { text: text.into(), terminate: false }
    }

    fn farewell(text: impl Into<String>) -> Self {
        Self { text: text.into(), terminate: true }
    }
}

/// Split a raw line into a lower-cased verb and its arguments
pub fn parse_input(raw: &str) -> Result<Command, CommandError> {
    let mut tokens = raw.split_whitespace();
    let verb = tokens.next().ok_or(CommandError::EmptyCommand)?;
    Ok(Command {
        verb: verb.to_lowercase(),
        args: tokens.map(str::to_string).collect(),
    })
}

/// Add a new contact
///
/// Appends to the file; adding an existing name leaves a duplicate line
/// behind (append semantics - the last line wins on read-back).
pub fn add_contact(args: &[String], store: &ContactStore) -> Result<String, CommandError> {
    let [name, phone] = args else {
        return Err(CommandError::WrongArgumentCount);
    };
    store.append(name, phone)?;
    Ok("Contact added.".to_string())
}

/// Replace the phone number of an existing contact
///
/// Rewrites the whole file so exactly one record per name remains.
pub fn change_contact(args: &[String], store: &ContactStore) -> Result<String, CommandError> {
    let [name, phone] = args else {
        return Err(CommandError::WrongArgumentCount);
    };
    if !store.exists() {
        return Ok(NO_CONTACTS_YET.to_string());
    }
    let mut contacts = store.load_all()?;
    if !contacts.contains(name) {
        return Err(StoreError::ContactNotFound(name.clone()).into());
    }
    contacts.upsert(name, phone);
    store.rewrite_all(&contacts)?;
    Ok("contact changed".to_string())
}

/// Look up one contact's phone number
pub fn phone_of(args: &[String], store: &ContactStore) -> Result<String, CommandError> {
    let name = args.first().ok_or(CommandError::MissingNameArgument)?;
    if !store.exists() {
        return Ok(NO_CONTACTS_YET.to_string());
    }
    let phone = store.find_one(name)?;
    Ok(format!("{} {}", name, phone))
}

/// Render every contact as a fixed-width table, in file order
pub fn all_contacts(store: &ContactStore) -> Result<String, CommandError> {
    if !store.exists() {
        return Ok(NO_CONTACTS_YET.to_string());
    }
    let contacts = store.load_all()?;

    let mut lines = Vec::new();
    lines.push(TABLE_BORDER.to_string());
    lines.push(format!("{:<10} | {:<10}", "Name", "Phone"));
    lines.push(TABLE_BORDER.to_string());
    for record in contacts.iter() {
        lines.push(format!("{:<10} | {}", record.name, record.phone));
    }
    lines.push(TABLE_BORDER.to_string());
    Ok(lines.join("\n"))
}

/// Route one parsed command to its operation
///
/// Lookup misses and argument-shape failures become replies via the
/// recovery supervisor; store corruption and I/O failures propagate so the
/// caller can abort the current command and keep the session alive.
pub fn dispatch(
    command: &Command,
    store: &ContactStore,
    prompter: &mut dyn recovery::Prompter,
) -> anyhow::Result<Reply> {
    let reply = match command.verb.as_str() {
        "close" | "exit" => Reply::farewell("Good bye!"),
        "hello" => Reply::message("How can I help you?"),
        "add" => Reply::message(recovery::classify(
            add_contact(&command.args, store),
            store,
            prompter,
        )?),
        "change" => Reply::message(recovery::classify(
            change_contact(&command.args, store),
            store,
            prompter,
        )?),
        "phone" => Reply::message(recovery::classify(
            phone_of(&command.args, store),
            store,
            prompter,
        )?),
        "all" => Reply::message(recovery::classify(
            all_contacts(store),
            store,
            prompter,
        )?),
        _ => Reply::message("Invalid command."),
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dispatch target for commands that must never open a dialog
    struct NoDialog;

    impl recovery::Prompter for NoDialog {
        fn notify(&mut self, text: &str) {
            panic!("unexpected dialog notice: {text}");
        }

        fn read_line(&mut self, prompt: &str) -> anyhow::Result<String> {
            panic!("unexpected dialog prompt: {prompt}");
        }
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn store_in(dir: &tempfile::TempDir) -> ContactStore {
        ContactStore::with_path(dir.path().join("contacts.txt"))
    }

    #[test]
    fn test_parse_input_lowercases_verb() {
        let command = parse_input("ADD Ann 123").unwrap();
        assert_eq!(command.verb, "add");
        assert_eq!(command.args, args(&["Ann", "123"]));
    }

    #[test]
    fn test_parse_input_preserves_argument_order() {
        let command = parse_input("  change   Bob   777  ").unwrap();
        assert_eq!(command.verb, "change");
        assert_eq!(command.args, args(&["Bob", "777"]));
    }

    #[test]
    fn test_parse_input_empty_line() {
        assert!(matches!(parse_input("   "), Err(CommandError::EmptyCommand)));
    }

    #[test]
    fn test_add_wrong_argument_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let err = add_contact(&args(&["OnlyName"]), &store).unwrap_err();
        assert!(matches!(err, CommandError::WrongArgumentCount));
        // Store untouched
        assert!(!store.exists());
    }

    #[test]
    fn test_phone_missing_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let err = phone_of(&[], &store).unwrap_err();
        assert!(matches!(err, CommandError::MissingNameArgument));
    }

    #[test]
    fn test_phone_before_any_add() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let reply = phone_of(&args(&["Ann"]), &store).unwrap();
        assert_eq!(reply, NO_CONTACTS_YET);
    }

    #[test]
    fn test_change_miss_is_contact_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append("Ann", "123").unwrap();

        let err = change_contact(&args(&["Bob", "777"]), &store).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Store(StoreError::ContactNotFound(name)) if name == "Bob"
        ));
    }

    #[test]
    fn test_change_rewrites_single_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append("Ann", "123").unwrap();
        store.append("Ann", "999").unwrap();

        let reply = change_contact(&args(&["Ann", "456"]), &store).unwrap();
        assert_eq!(reply, "contact changed");

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "Ann:456\n");
    }

    #[test]
    fn test_all_table_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append("Ann", "123").unwrap();
        store.append("Bob", "777").unwrap();

        let table = all_contacts(&store).unwrap();
        let expected = "\
-------------------------\n\
Name       | Phone     \n\
-------------------------\n\
Ann        | 123\n\
Bob        | 777\n\
-------------------------";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_all_before_any_add() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(all_contacts(&store).unwrap(), NO_CONTACTS_YET);
    }

    #[test]
    fn test_dispatch_hello() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let command = parse_input("hello").unwrap();
        let reply = dispatch(&command, &store, &mut NoDialog).unwrap();
        assert_eq!(reply.text, "How can I help you?");
        assert!(!reply.terminate);
    }

    #[test]
    fn test_dispatch_exit_verbs() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for line in ["close", "exit", "EXIT"] {
            let command = parse_input(line).unwrap();
            let reply = dispatch(&command, &store, &mut NoDialog).unwrap();
            assert_eq!(reply.text, "Good bye!");
            assert!(reply.terminate);
        }
    }

    #[test]
    fn test_dispatch_unknown_verb() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let command = parse_input("frobnicate Ann").unwrap();
        let reply = dispatch(&command, &store, &mut NoDialog).unwrap();
        assert_eq!(reply.text, "Invalid command.");
        assert!(!reply.terminate);
    }

    #[test]
    fn test_dispatch_aborts_on_corrupt_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "garbage without separator\n").unwrap();

        let command = parse_input("all").unwrap();
        let err = dispatch(&command, &store, &mut NoDialog).unwrap_err();
        assert!(err.to_string().contains("malformed record"));
    }
}
