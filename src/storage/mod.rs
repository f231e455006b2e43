use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::codec::RecordCodec;
use crate::config::CodecConfig;
use crate::error::{Result, WalletError};
use crate::record::Record;

/// A wallet file loaded into memory.
pub struct WalletStore {
    path: PathBuf,
    codec: RecordCodec,
    records: Vec<Record>,
}

impl WalletStore {
    /// Create a new, empty wallet file
    pub fn init(path: &Path, config: CodecConfig) -> Result<Self> {
        if path.exists() {
            return Err(WalletError::AlreadyInitialized(path.to_path_buf()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let store = Self {
            path: path.to_path_buf(),
            codec: RecordCodec::new(config),
            records: Vec::new(),
        };
        store.save()?;

        Ok(store)
    }

    /// Open an existing wallet file
    pub fn open(path: &Path, config: CodecConfig) -> Result<Self> {
        if !path.exists() {
            return Err(WalletError::NotInitialized(path.to_path_buf()));
        }

        let codec = RecordCodec::new(config);
        let records = codec.deserialize(BufReader::new(File::open(path)?))?;
        info!(path = %path.display(), records = records.len(), "opened wallet");

        let store = Self {
            path: path.to_path_buf(),
            codec,
            records,
        };
        for uuid in store.duplicate_ids() {
            warn!(uuid = %uuid, "duplicate record id, only the first record is reachable by id");
        }

        Ok(store)
    }

    /// Write all records back to disk. The document goes to a sibling
    /// temporary file first and replaces the wallet only once complete.
    pub fn save(&self) -> Result<()> {
        let tmp = self.tmp_path();
        {
            let file = File::create(&tmp)?;
            if let Err(e) = self.codec.serialize(&self.records, BufWriter::new(file)) {
                let _ = fs::remove_file(&tmp);
                return Err(e);
            }
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(path = %self.path.display(), records = self.records.len(), "saved wallet");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn codec(&self) -> &RecordCodec {
        &self.codec
    }

    /// Records in file order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn add(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Append records from another wallet, skipping identifiers already present.
    /// Returns how many were added.
    pub fn import(&mut self, records: Vec<Record>) -> usize {
        let mut added = 0;
        for record in records {
            if self.records.iter().any(|r| r.uuid == record.uuid) {
                debug!(uuid = %record.uuid, "skipping import of existing record");
                continue;
            }
            self.records.push(record);
            added += 1;
        }
        added
    }

    /// Find a record by full identifier or unique identifier prefix
    pub fn find(&self, id: &str) -> Result<&Record> {
        let index = self.index_of(id)?;
        Ok(&self.records[index])
    }

    pub fn find_mut(&mut self, id: &str) -> Result<&mut Record> {
        let index = self.index_of(id)?;
        Ok(&mut self.records[index])
    }

    pub fn remove(&mut self, id: &str) -> Result<Record> {
        let index = self.index_of(id)?;
        Ok(self.records.remove(index))
    }

    /// Case-insensitive substring search over names, types, notes and fields
    pub fn search(&self, query: &str) -> Vec<&Record> {
        let query = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| matches_query(r, &query))
            .collect()
    }

    pub fn favorites(&self) -> Vec<&Record> {
        self.records.iter().filter(|r| r.favorite).collect()
    }

    /// Records ordered by name, case-insensitively
    pub fn sorted_by_name(&self) -> Vec<&Record> {
        let mut sorted: Vec<&Record> = self.records.iter().collect();
        sorted.sort_by_cached_key(|r| r.name.to_lowercase());
        sorted
    }

    /// Identifiers carried by more than one record, in file order
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for record in &self.records {
            let uuid = record.uuid.as_str();
            if !seen.insert(uuid) && !duplicates.contains(&uuid) {
                duplicates.push(uuid);
            }
        }
        duplicates
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        if id.is_empty() {
            return Err(WalletError::RecordNotFound(id.to_string()));
        }

        if let Some(index) = self.records.iter().position(|r| r.uuid == id) {
            return Ok(index);
        }

        let mut matches = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.uuid.starts_with(id))
            .map(|(i, _)| i);

        match (matches.next(), matches.next()) {
            (Some(index), None) => Ok(index),
            (Some(_), Some(_)) => Err(WalletError::AmbiguousId(id.to_string())),
            (None, _) => Err(WalletError::RecordNotFound(id.to_string())),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("wallet.xml"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn matches_query(record: &Record, query: &str) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(query);

    hit(&record.name)
        || hit(&record.record_type)
        || hit(record.note_text())
        || record
            .fields()
            .iter()
            .any(|f| hit(&f.name) || hit(&f.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;
    use tempfile::TempDir;

    fn wallet_path(tmp: &TempDir) -> PathBuf {
        tmp.path().join("wallet.xml")
    }

    #[test]
    fn test_init_creates_wallet_file() {
        let tmp = TempDir::new().unwrap();
        let store = WalletStore::init(&wallet_path(&tmp), CodecConfig::default()).unwrap();

        assert!(store.path().exists());
        assert!(store.is_empty());
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("<wallet>"));
        assert!(!tmp.path().join("wallet.xml.tmp").exists());
    }

    #[test]
    fn test_init_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/wallet.xml");
        WalletStore::init(&path, CodecConfig::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_init_fails_if_already_initialized() {
        let tmp = TempDir::new().unwrap();
        WalletStore::init(&wallet_path(&tmp), CodecConfig::default()).unwrap();

        let result = WalletStore::init(&wallet_path(&tmp), CodecConfig::default());
        assert!(matches!(result, Err(WalletError::AlreadyInitialized(_))));
    }

    #[test]
    fn test_open_fails_if_not_initialized() {
        let tmp = TempDir::new().unwrap();

        let result = WalletStore::open(&wallet_path(&tmp), CodecConfig::default());
        assert!(matches!(result, Err(WalletError::NotInitialized(_))));
    }

    #[test]
    fn test_add_save_and_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = wallet_path(&tmp);
        let mut store = WalletStore::init(&path, CodecConfig::default()).unwrap();

        let mut card = Record::new_card("Bank", "CREDIT_CARD", "BANK");
        card.add_field(Field::new("pin", "PIN", "1234")).unwrap();
        store.add(card.clone());
        store.add(Record::new_note("Todo", "call mom"));
        store.save().unwrap();

        let reopened = WalletStore::open(&path, CodecConfig::default()).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.records()[0], card);
        assert_eq!(reopened.records()[1].note_text(), "call mom");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let tmp = TempDir::new().unwrap();
        let path = wallet_path(&tmp);
        let mut store = WalletStore::init(&path, CodecConfig::default()).unwrap();
        store.add(Record::new_note("Todo", "x"));

        // A non-empty directory in place of the wallet makes the rename fail.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(matches!(store.save(), Err(WalletError::Io(_))));
        assert!(!tmp.path().join("wallet.xml.tmp").exists());
    }

    #[test]
    fn test_open_reports_duplicate_ids() {
        let tmp = TempDir::new().unwrap();
        let path = wallet_path(&tmp);
        fs::write(
            &path,
            r#"<wallet><records>
                <record recordClass="NOTE" uuid="dup" modified="1" name="first"/>
                <record recordClass="NOTE" uuid="solo" modified="1" name="solo"/>
                <record recordClass="NOTE" uuid="dup" modified="2" name="second"/>
                <record recordClass="CARD" uuid="dup" modified="3" name="third"/>
            </records></wallet>"#,
        )
        .unwrap();

        let store = WalletStore::open(&path, CodecConfig::default()).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.duplicate_ids(), ["dup"]);
        assert_eq!(store.find("dup").unwrap().name, "first");
    }

    #[test]
    fn test_no_duplicate_ids_in_fresh_wallet() {
        let tmp = TempDir::new().unwrap();
        let mut store = WalletStore::init(&wallet_path(&tmp), CodecConfig::default()).unwrap();
        store.add(Record::new_note("a", ""));
        store.add(Record::new_note("b", ""));
        assert!(store.duplicate_ids().is_empty());
    }

    #[test]
    fn test_open_corrupt_wallet_fails() {
        let tmp = TempDir::new().unwrap();
        let path = wallet_path(&tmp);
        fs::write(&path, "<wallet><records>").unwrap();

        let result = WalletStore::open(&path, CodecConfig::default());
        assert!(matches!(result, Err(WalletError::Format(_))));
    }

    #[test]
    fn test_find_by_prefix() {
        let tmp = TempDir::new().unwrap();
        let mut store = WalletStore::init(&wallet_path(&tmp), CodecConfig::default()).unwrap();
        store.add(Record::note("abc-111", 1, "one", "NOTE", "", "", false));
        store.add(Record::note("abc-222", 1, "two", "NOTE", "", "", false));
        store.add(Record::note("abc", 1, "exact", "NOTE", "", "", false));

        assert_eq!(store.find("abc-1").unwrap().name, "one");
        assert_eq!(store.find("abc").unwrap().name, "exact");
        assert!(matches!(store.find("abc-"), Err(WalletError::AmbiguousId(_))));
        assert!(matches!(store.find("zzz"), Err(WalletError::RecordNotFound(_))));
        assert!(matches!(store.find(""), Err(WalletError::RecordNotFound(_))));
    }

    #[test]
    fn test_find_mut_and_remove() {
        let tmp = TempDir::new().unwrap();
        let mut store = WalletStore::init(&wallet_path(&tmp), CodecConfig::default()).unwrap();
        store.add(Record::note("n1", 1, "one", "NOTE", "", "", false));

        store.find_mut("n1").unwrap().toggle_favorite();
        assert!(store.find("n1").unwrap().favorite);

        let removed = store.remove("n1").unwrap();
        assert_eq!(removed.name, "one");
        assert!(store.is_empty());
    }

    #[test]
    fn test_search() {
        let tmp = TempDir::new().unwrap();
        let mut store = WalletStore::init(&wallet_path(&tmp), CodecConfig::default()).unwrap();
        let mut card = Record::new_card("Mail", "EMAIL", "EMAIL");
        card.add_field(Field::new("login", "STRING", "Alice@example.com")).unwrap();
        store.add(card);
        store.add(Record::new_note("Recipes", "pancakes with ALICE"));
        store.add(Record::new_note("Other", "nothing"));

        let hits = store.search("alice");
        assert_eq!(hits.len(), 2);
        assert_eq!(store.search("email").len(), 1);
        assert!(store.search("missing").is_empty());
    }

    #[test]
    fn test_favorites_and_sorting() {
        let tmp = TempDir::new().unwrap();
        let mut store = WalletStore::init(&wallet_path(&tmp), CodecConfig::default()).unwrap();
        store.add(Record::note("1", 1, "zeta", "NOTE", "", "", true));
        store.add(Record::note("2", 1, "Alpha", "NOTE", "", "", false));
        store.add(Record::note("3", 1, "beta", "NOTE", "", "", true));

        let names: Vec<_> = store.sorted_by_name().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "beta", "zeta"]);
        assert_eq!(store.favorites().len(), 2);
    }

    #[test]
    fn test_import_skips_existing_ids() {
        let tmp = TempDir::new().unwrap();
        let mut store = WalletStore::init(&wallet_path(&tmp), CodecConfig::default()).unwrap();
        store.add(Record::note("same", 1, "mine", "NOTE", "", "", false));

        let added = store.import(vec![
            Record::note("same", 2, "theirs", "NOTE", "", "", false),
            Record::note("new", 2, "new", "NOTE", "", "", false),
        ]);
        assert_eq!(added, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.find("same").unwrap().name, "mine");
    }
}
