use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::config::CodecConfig;
use crate::error::{Result, WalletError};
use crate::record::{Field, Record, RecordClass};
use crate::storage::WalletStore;

pub fn handle_init(file: &Path, config: CodecConfig) -> Result<()> {
    let store = WalletStore::init(file, config)?;
    println!("Initialized wallet in {}", store.path().display());
    Ok(())
}

pub fn handle_add_card(
    file: &Path,
    config: CodecConfig,
    name: String,
    record_type: String,
    picture: String,
    fields: Vec<String>,
    note: Option<String>,
    json: bool,
) -> Result<()> {
    require_name(&name)?;
    let mut store = WalletStore::open(file, config)?;

    let mut card = Record::new_card(name, record_type, picture);
    for field in &fields {
        let field: Field = field.parse().map_err(WalletError::Format)?;
        card.add_field(field)?;
    }
    if let Some(note) = note {
        card.set_note_text(note);
    }

    store.add(card.clone());
    store.save()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&card)?);
    } else {
        println!("Created card ({}) - {}", card.short_id(), card.name);
    }

    Ok(())
}

pub fn handle_add_note(
    file: &Path,
    config: CodecConfig,
    name: String,
    text: Option<String>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    require_name(&name)?;
    let mut store = WalletStore::open(file, config)?;

    let text = if stdin {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        content
    } else {
        text.unwrap_or_default()
    };

    let note = Record::new_note(name, text);
    store.add(note.clone());
    store.save()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("Created note ({}) - {}", note.short_id(), note.name);
    }

    Ok(())
}

pub fn handle_list(
    file: &Path,
    config: CodecConfig,
    favorites: bool,
    class: Option<String>,
    json: bool,
) -> Result<()> {
    let class = parse_class(class)?;
    let store = WalletStore::open(file, config)?;

    let records: Vec<&Record> = store
        .sorted_by_name()
        .into_iter()
        .filter(|r| !favorites || r.favorite)
        .filter(|r| class.map_or(true, |c| r.class() == c))
        .collect();

    print_records(&records, json)
}

pub fn handle_show(file: &Path, config: CodecConfig, id: String, json: bool) -> Result<()> {
    let store = WalletStore::open(file, config)?;
    let record = store.find(&id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    println!("{}{}", favorite_marker(record), record.name);
    println!("  id:       {}", record.uuid);
    println!("  class:    {}", record.class());
    println!("  type:     {}", record.record_type);
    if !record.picture.is_empty() {
        println!("  picture:  {}", record.picture);
    }
    println!("  modified: {}", format_modified(record));

    if !record.fields().is_empty() {
        println!("\n  Fields:");
        for f in record.fields() {
            println!("    {} ({}): {}", f.name, f.field_type, f.value);
        }
    }

    if !record.note_text().is_empty() {
        println!("\n{}", record.note_text());
    }

    Ok(())
}

pub fn handle_field_add(
    file: &Path,
    config: CodecConfig,
    id: String,
    name: String,
    field_type: String,
    value: String,
) -> Result<()> {
    let mut store = WalletStore::open(file, config)?;

    let record = store.find_mut(&id)?;
    record.add_field(Field::new(name.clone(), field_type, value))?;
    record.touch();
    let label = format!("({}) - {}", record.short_id(), record.name);

    store.save()?;
    println!("Added field '{}' to {}", name, label);
    Ok(())
}

pub fn handle_field_remove(file: &Path, config: CodecConfig, id: String, name: String) -> Result<()> {
    let mut store = WalletStore::open(file, config)?;

    let record = store.find_mut(&id)?;
    if !record.remove_field(&name)? {
        println!("No field '{}' on ({}) - {}", name, record.short_id(), record.name);
        return Ok(());
    }
    record.touch();
    let label = format!("({}) - {}", record.short_id(), record.name);

    store.save()?;
    println!("Removed field '{}' from {}", name, label);
    Ok(())
}

pub fn handle_favorite(file: &Path, config: CodecConfig, id: String) -> Result<()> {
    let mut store = WalletStore::open(file, config)?;

    let record = store.find_mut(&id)?;
    record.toggle_favorite();
    record.touch();
    let message = format!(
        "{} ({}) - {}",
        if record.favorite { "Starred" } else { "Unstarred" },
        record.short_id(),
        record.name
    );

    store.save()?;
    println!("{}", message);
    Ok(())
}

pub fn handle_delete(file: &Path, config: CodecConfig, id: String) -> Result<()> {
    let mut store = WalletStore::open(file, config)?;

    let record = store.remove(&id)?;
    store.save()?;

    println!("Deleted {} ({}) - {}", record.class(), record.short_id(), record.name);
    Ok(())
}

pub fn handle_search(
    file: &Path,
    config: CodecConfig,
    query: String,
    class: Option<String>,
    json: bool,
) -> Result<()> {
    let class = parse_class(class)?;
    let store = WalletStore::open(file, config)?;
    let results: Vec<&Record> = store
        .search(&query)
        .into_iter()
        .filter(|r| class.map_or(true, |c| r.class() == c))
        .collect();

    if !json && results.is_empty() {
        println!("No records matching '{}'.", query);
        return Ok(());
    }

    print_records(&results, json)
}

pub fn handle_export(file: &Path, config: CodecConfig) -> Result<()> {
    let store = WalletStore::open(file, config)?;
    println!("{}", serde_json::to_string_pretty(store.records())?);
    Ok(())
}

pub fn handle_import(file: &Path, config: CodecConfig, source: &Path) -> Result<()> {
    let mut store = WalletStore::open(file, config)?;

    let incoming = store
        .codec()
        .deserialize(BufReader::new(File::open(source)?))?;
    let total = incoming.len();
    let added = store.import(incoming);
    store.save()?;

    println!(
        "Imported {} of {} records from {}",
        added,
        total,
        source.display()
    );
    Ok(())
}

fn print_records(records: &[&Record], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else if records.is_empty() {
        println!("No records found.");
    } else {
        for r in records {
            println!(
                "  ({}) [{}] {}{}  {}",
                r.short_id(),
                r.class(),
                favorite_marker(r),
                r.name,
                format_modified(r)
            );
        }
    }
    Ok(())
}

/// Names must not be blank.
fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(WalletError::Format("record name must not be empty".to_string()));
    }
    Ok(())
}

fn parse_class(class: Option<String>) -> Result<Option<RecordClass>> {
    class.map(|c| c.parse::<RecordClass>()).transpose()
}

fn favorite_marker(record: &Record) -> &'static str {
    if record.favorite {
        "* "
    } else {
        ""
    }
}

fn format_modified(record: &Record) -> String {
    record
        .modified_at()
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| record.modified.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_name_rejects_blank() {
        assert!(require_name("Bank").is_ok());
        assert!(matches!(require_name(""), Err(WalletError::Format(_))));
        assert!(matches!(require_name("   "), Err(WalletError::Format(_))));
    }

    #[test]
    fn test_parse_class() {
        assert_eq!(parse_class(None).unwrap(), None);
        assert_eq!(
            parse_class(Some("Card".to_string())).unwrap(),
            Some(RecordClass::Card)
        );
        assert!(matches!(
            parse_class(Some("secret".to_string())),
            Err(WalletError::InvalidRecordClass(_))
        ));
    }
}
