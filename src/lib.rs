pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod record;
pub mod storage;

pub use codec::{deserialize, serialize, RecordCodec};
pub use config::CodecConfig;
pub use error::{Result, WalletError};
pub use record::{Field, Record, RecordBody, RecordClass};
pub use storage::WalletStore;
