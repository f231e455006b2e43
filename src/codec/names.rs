//! Element and attribute names of the wallet document.

pub const WALLET: &str = "wallet";
pub const RECORDS: &str = "records";
pub const RECORD: &str = "record";
pub const FIELDS: &str = "fields";
pub const FIELD: &str = "field";
pub const NOTE: &str = "note";

pub const CLASS_ATTR: &str = "recordClass";
pub const UUID_ATTR: &str = "uuid";
pub const NAME_ATTR: &str = "name";
pub const TYPE_ATTR: &str = "type";
pub const MODIFIED_ATTR: &str = "modified";
pub const PICTURE_ATTR: &str = "picture";
pub const FAVORITE_ATTR: &str = "favorite";
pub const VALUE_ATTR: &str = "value";
