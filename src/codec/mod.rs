//! XML codec for wallet records.
//!
//! A wallet document looks like this:
//!
//! ```xml
//! <wallet>
//!     <records>
//!         <record recordClass="CARD" uuid="..." name="Bank" type="..." modified="1700000000000" picture="BANK" favorite="false">
//!             <fields>
//!                 <field name="login" type="STRING" value="alice"/>
//!             </fields>
//!             <note>text</note>
//!         </record>
//!         <record recordClass="NOTE" uuid="..." name="Todo" type="NOTE" modified="1700000000000" picture="" favorite="true">text</record>
//!     </records>
//! </wallet>
//! ```
//!
//! Cards keep their note in a `<note>` child, notes keep their text directly
//! under `<record>`.

mod names;
mod reader;
mod writer;

use std::io::{Read, Write};

use tracing::info;

use crate::config::CodecConfig;
use crate::error::{Result, WalletError};
use crate::record::Record;

/// Reads and writes wallet documents with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct RecordCodec {
    config: CodecConfig,
}

impl RecordCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Write `records` as a wallet document, preserving their order.
    pub fn serialize<W: Write>(&self, records: &[Record], mut out: W) -> Result<()> {
        let bytes = self.encode(records)?;
        out.write_all(&bytes)?;
        out.flush()?;
        info!(records = records.len(), bytes = bytes.len(), "wrote wallet");
        Ok(())
    }

    /// Read every record of a wallet document in document order.
    ///
    /// Records with a missing or unknown `recordClass` are skipped; an
    /// unparseable `modified` attribute fails the whole call.
    pub fn deserialize<R: Read>(&self, mut input: R) -> Result<Vec<Record>> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| WalletError::Format(format!("wallet is not valid UTF-8: {}", e)))?;
        self.deserialize_str(&text)
    }

    pub fn serialize_to_string(&self, records: &[Record]) -> Result<String> {
        let bytes = self.encode(records)?;
        String::from_utf8(bytes).map_err(|e| WalletError::Format(e.to_string()))
    }

    pub fn deserialize_str(&self, text: &str) -> Result<Vec<Record>> {
        let records = reader::read_document(text, &self.config)?;
        info!(records = records.len(), "read wallet");
        Ok(records)
    }

    fn encode(&self, records: &[Record]) -> Result<Vec<u8>> {
        self.config.validate()?;
        writer::write_document(records, self.config.indent)
    }
}

/// [`RecordCodec::serialize`] with the default configuration.
pub fn serialize<W: Write>(records: &[Record], out: W) -> Result<()> {
    RecordCodec::default().serialize(records, out)
}

/// [`RecordCodec::deserialize`] with the default configuration.
pub fn deserialize<R: Read>(input: R) -> Result<Vec<Record>> {
    RecordCodec::default().deserialize(input)
}
