//! Record codec - the `name:phone` line format and its in-memory view
//!
//! One record per line, fields joined by a single `:`. The format defines
//! no escaping, so a separator inside a name cannot be represented; encode
//! rejects it instead of corrupting the file.

use super::StoreError;

/// Field separator between name and phone on disk
pub const SEPARATOR: char = ':';

/// One name → phone association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub name: String,
    pub phone: String,
}

/// Encode a record as a single line (no trailing newline)
pub fn encode_record(name: &str, phone: &str) -> Result<String, StoreError> {
    if name.contains(SEPARATOR) {
        return Err(StoreError::SeparatorInName(name.to_string()));
    }
    Ok(format!("{}{}{}", name, SEPARATOR, phone))
}

/// Decode a single line, splitting on the first separator occurrence
pub fn decode_record(line: &str, line_no: usize) -> Result<ContactRecord, StoreError> {
    match line.split_once(SEPARATOR) {
        Some((name, phone)) => Ok(ContactRecord {
            name: name.to_string(),
            phone: phone.to_string(),
        }),
        None => Err(StoreError::MalformedRecord {
            line: line_no,
            content: line.to_string(),
        }),
    }
}

/// In-memory view of the contact file
///
/// Preserves on-disk order for listing. Duplicate names collapse last-wins,
/// matching how repeated appends of the same name read back.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Contacts {
    records: Vec<ContactRecord>,
}

impl Contacts {
    /// Create an empty record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, or update the phone in place if the name exists
    pub fn upsert(&mut self, name: &str, phone: &str) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.name == name) {
            existing.phone = phone.to_string();
        } else {
            self.records.push(ContactRecord {
                name: name.to_string(),
                phone: phone.to_string(),
            });
        }
    }

    /// Look up a phone number by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.phone.as_str())
    }

    /// Whether a record with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ContactRecord> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_record() {
        assert_eq!(encode_record("Ann", "123").unwrap(), "Ann:123");
    }

    #[test]
    fn test_encode_rejects_separator_in_name() {
        let err = encode_record("An:n", "123").unwrap_err();
        assert!(matches!(err, StoreError::SeparatorInName(name) if name == "An:n"));
    }

    #[test]
    fn test_decode_record() {
        let record = decode_record("Ann:123", 1).unwrap();
        assert_eq!(record.name, "Ann");
        assert_eq!(record.phone, "123");
    }

    #[test]
    fn test_decode_splits_on_first_separator() {
        // Extra separators belong to the phone field
        let record = decode_record("Ann:123:456", 1).unwrap();
        assert_eq!(record.name, "Ann");
        assert_eq!(record.phone, "123:456");
    }

    #[test]
    fn test_decode_malformed_line() {
        let err = decode_record("no separator here", 7).unwrap_err();
        match err {
            StoreError::MalformedRecord { line, content } => {
                assert_eq!(line, 7);
                assert_eq!(content, "no separator here");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_contacts_preserve_insertion_order() {
        let mut contacts = Contacts::new();
        contacts.upsert("Bob", "1");
        contacts.upsert("Ann", "2");
        contacts.upsert("Zoe", "3");

        let names: Vec<&str> = contacts.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ann", "Zoe"]);
    }

    #[test]
    fn test_contacts_upsert_last_wins() {
        let mut contacts = Contacts::new();
        contacts.upsert("Ann", "123");
        contacts.upsert("Bob", "777");
        contacts.upsert("Ann", "456");

        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts.get("Ann"), Some("456"));
        // Update keeps the original position
        let names: Vec<&str> = contacts.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob"]);
    }

    #[test]
    fn test_contacts_get_missing() {
        let contacts = Contacts::new();
        assert!(contacts.get("Ann").is_none());
        assert!(!contacts.contains("Ann"));
        assert!(contacts.is_empty());
    }
}
