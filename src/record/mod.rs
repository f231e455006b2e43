mod class;
mod field;

pub use class::RecordClass;
pub use field::Field;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, WalletError};

/// Shape-specific part of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "UPPERCASE")]
pub enum RecordBody {
    Card { fields: Vec<Field>, note: String },
    Note { text: String },
}

/// A single wallet entry, either a credential card or a free-text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    /// Last modification time, epoch milliseconds.
    pub modified: u64,
    pub picture: String,
    pub favorite: bool,
    #[serde(flatten)]
    pub body: RecordBody,
}

impl Record {
    /// New empty card with a fresh identifier, stamped now.
    pub fn new_card(
        name: impl Into<String>,
        record_type: impl Into<String>,
        picture: impl Into<String>,
    ) -> Self {
        Self::card(
            generate_uuid(),
            now_millis(),
            name,
            record_type,
            picture,
            Vec::new(),
            String::new(),
            false,
        )
    }

    /// New note with a fresh identifier, stamped now.
    pub fn new_note(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::note(generate_uuid(), now_millis(), name, "NOTE", "", text, false)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn card(
        uuid: impl Into<String>,
        modified: u64,
        name: impl Into<String>,
        record_type: impl Into<String>,
        picture: impl Into<String>,
        fields: Vec<Field>,
        note: impl Into<String>,
        favorite: bool,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            record_type: record_type.into(),
            modified,
            picture: picture.into(),
            favorite,
            body: RecordBody::Card {
                fields,
                note: note.into(),
            },
        }
    }

    pub fn note(
        uuid: impl Into<String>,
        modified: u64,
        name: impl Into<String>,
        record_type: impl Into<String>,
        picture: impl Into<String>,
        text: impl Into<String>,
        favorite: bool,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            record_type: record_type.into(),
            modified,
            picture: picture.into(),
            favorite,
            body: RecordBody::Note { text: text.into() },
        }
    }

    pub fn class(&self) -> RecordClass {
        match self.body {
            RecordBody::Card { .. } => RecordClass::Card,
            RecordBody::Note { .. } => RecordClass::Note,
        }
    }

    pub fn is_card(&self) -> bool {
        self.class() == RecordClass::Card
    }

    pub fn is_note(&self) -> bool {
        self.class() == RecordClass::Note
    }

    /// Fields of a card; notes have none.
    pub fn fields(&self) -> &[Field] {
        match &self.body {
            RecordBody::Card { fields, .. } => fields,
            RecordBody::Note { .. } => &[],
        }
    }

    /// The card note or the note text.
    pub fn note_text(&self) -> &str {
        match &self.body {
            RecordBody::Card { note, .. } => note,
            RecordBody::Note { text } => text,
        }
    }

    pub fn set_note_text(&mut self, value: impl Into<String>) {
        match &mut self.body {
            RecordBody::Card { note, .. } => *note = value.into(),
            RecordBody::Note { text } => *text = value.into(),
        }
    }

    pub fn add_field(&mut self, field: Field) -> Result<()> {
        match &mut self.body {
            RecordBody::Card { fields, .. } => {
                fields.push(field);
                Ok(())
            }
            RecordBody::Note { .. } => Err(WalletError::NotACard(self.uuid.clone())),
        }
    }

    /// Removes every field called `name`. Returns whether anything was removed.
    pub fn remove_field(&mut self, name: &str) -> Result<bool> {
        match &mut self.body {
            RecordBody::Card { fields, .. } => {
                let before = fields.len();
                fields.retain(|f| f.name != name);
                Ok(fields.len() != before)
            }
            RecordBody::Note { .. } => Err(WalletError::NotACard(self.uuid.clone())),
        }
    }

    pub fn toggle_favorite(&mut self) {
        self.favorite = !self.favorite;
    }

    /// Re-stamp the modification time with the current time.
    pub fn touch(&mut self) {
        self.modified = now_millis();
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.modified)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    /// Shorten the identifier for display (first 8 chars)
    pub fn short_id(&self) -> String {
        self.uuid.chars().take(8).collect()
    }
}

pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

pub fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_defaults() {
        let card = Record::new_card("Bank", "CREDIT_CARD", "BANK");
        assert!(card.is_card());
        assert!(!card.uuid.is_empty());
        assert!(card.fields().is_empty());
        assert_eq!(card.note_text(), "");
        assert!(!card.favorite);
        assert!(card.modified > 0);
    }

    #[test]
    fn test_new_records_get_distinct_ids() {
        let a = Record::new_note("a", "");
        let b = Record::new_note("b", "");
        assert_ne!(a.uuid, b.uuid);
    }

    #[test]
    fn test_add_and_remove_field() {
        let mut card = Record::new_card("Mail", "EMAIL", "EMAIL");
        card.add_field(Field::new("login", "STRING", "alice")).unwrap();
        card.add_field(Field::new("password", "HIDDEN", "s3cret")).unwrap();
        assert_eq!(card.fields().len(), 2);

        assert!(card.remove_field("login").unwrap());
        assert!(!card.remove_field("login").unwrap());
        assert_eq!(card.fields()[0].name, "password");
    }

    #[test]
    fn test_note_has_no_fields() {
        let mut note = Record::new_note("Todo", "buy milk");
        assert!(note.fields().is_empty());
        assert!(matches!(
            note.add_field(Field::new("x", "STRING", "y")),
            Err(WalletError::NotACard(_))
        ));
        assert!(note.remove_field("x").is_err());
    }

    #[test]
    fn test_note_text_accessors() {
        let mut note = Record::new_note("Todo", "buy milk");
        assert_eq!(note.note_text(), "buy milk");
        note.set_note_text("buy bread");
        assert_eq!(note.note_text(), "buy bread");

        let mut card = Record::new_card("Bank", "CARD", "BANK");
        card.set_note_text("pin is in the safe");
        assert_eq!(card.note_text(), "pin is in the safe");
    }

    #[test]
    fn test_toggle_favorite() {
        let mut card = Record::new_card("Bank", "CARD", "BANK");
        card.toggle_favorite();
        assert!(card.favorite);
        card.toggle_favorite();
        assert!(!card.favorite);
    }

    #[test]
    fn test_modified_at() {
        let note = Record::note("id", 1_600_000_000_000, "n", "NOTE", "", "", false);
        let dt = note.modified_at().unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2020-09-13");
    }

    #[test]
    fn test_short_id() {
        let note = Record::note("abc-123", 0, "n", "NOTE", "", "", false);
        assert_eq!(note.short_id(), "abc-123");
        let card = Record::new_card("c", "CARD", "");
        assert_eq!(card.short_id().len(), 8);
    }

    #[test]
    fn test_json_shape() {
        let card = Record::card(
            "abc",
            42,
            "Bank",
            "CARD",
            "BANK",
            vec![Field::new("login", "STRING", "alice")],
            "",
            true,
        );
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["class"], "CARD");
        assert_eq!(json["type"], "CARD");
        assert_eq!(json["fields"][0]["value"], "alice");

        let parsed: Record = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, card);
    }
}
