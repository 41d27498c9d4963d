//! FLEX binary load format codec
//!
//! A FLEX load file is a sequence of records:
//! `[tag:1][address:2 BE][count:1 if data][payload:count bytes if data]`.
//! Zero bytes between records are filler and carry no record semantics.
//! The format stores no checksum and has no end marker beyond the end of
//! the stream.

use crate::record::{DecodeError, EncodeError, Record, FLEX_DATA_TAG, FLEX_TRANSFER_TAG, MAX_FLEX_PAYLOAD};

/// Decodes FLEX binary load records
pub struct FlexDecoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> FlexDecoder<'a> {
    /// Create a decoder over a byte source
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset into the input
    pub fn offset(&self) -> usize {
        self.pos
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.input.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    /// Read one byte, treating end of stream as a truncated record.
    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        self.next_byte().ok_or(DecodeError::Truncated { offset: self.pos })
    }

    fn read_word(&mut self) -> Result<u16, DecodeError> {
        let high = self.read_byte()?;
        let low = self.read_byte()?;
        Ok(u16::from_be_bytes([high, low]))
    }

    /// Decode the next record.
    ///
    /// Returns `Ok(None)` on clean end of stream (possibly after trailing
    /// filler). Once an error is returned the stream position can no
    /// longer be trusted and decoding must stop.
    pub fn next_record(&mut self) -> Result<Option<Record>, DecodeError> {
        // Skip zero filler between records; files may have trailing zeroes
        let tag = loop {
            match self.next_byte() {
                None => return Ok(None),
                Some(0x00) => continue,
                Some(tag) => break tag,
            }
        };

        match tag {
            FLEX_DATA_TAG => {
                let address = self.read_word()?;
                let count = self.read_byte()? as usize;
                if self.pos + count > self.input.len() {
                    return Err(DecodeError::Truncated { offset: self.input.len() });
                }
                let bytes = self.input[self.pos..self.pos + count].to_vec();
                self.pos += count;
                Ok(Some(Record::Data { address, bytes }))
            }
            FLEX_TRANSFER_TAG => {
                let address = self.read_word()?;
                Ok(Some(Record::TransferAddress { address }))
            }
            tag => Err(DecodeError::UnrecognizedType { tag, offset: self.pos - 1 }),
        }
    }
}

/// Encodes records into the FLEX binary load format
pub struct FlexEncoder {
    // Stateless; record kinds with no FLEX representation are dropped here
}

impl FlexEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {}
    }

    /// Append one record's FLEX representation to `out`.
    ///
    /// A null transfer address carries no information and is skipped.
    /// `Header` and `Count` records have no FLEX representation and are
    /// silently dropped. An empty data record is written with count 0.
    pub fn encode(&self, record: &Record, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        match record {
            Record::Data { address, bytes } => {
                if bytes.len() > MAX_FLEX_PAYLOAD {
                    return Err(EncodeError::PayloadTooLong { len: bytes.len(), max: MAX_FLEX_PAYLOAD });
                }
                out.push(FLEX_DATA_TAG);
                out.extend_from_slice(&address.to_be_bytes());
                out.push(bytes.len() as u8);
                out.extend_from_slice(bytes);
            }
            Record::TransferAddress { address } => {
                if *address != 0 {
                    out.push(FLEX_TRANSFER_TAG);
                    out.extend_from_slice(&address.to_be_bytes());
                }
            }
            Record::Header { .. } | Record::Count { .. } => {}
        }
        Ok(())
    }
}

impl Default for FlexEncoder {
    fn default() -> Self {
        Self::new()
    }
}
