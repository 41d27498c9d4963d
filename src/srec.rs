//! Motorola S-record text format codec
//!
//! Each record is one ASCII line:
//! `S<type:1><count:2 hex><address:4 hex>[<payload>]<checksum:2 hex>`.
//! The count byte covers everything after itself up to and including the
//! checksum, so the payload is `count - 3` bytes. NUL, CR and LF between
//! records are filler. Supported types are S0 (header), S1 (data),
//! S5 (record count) and S9 (transfer address); the 24- and 32-bit
//! address types are rejected.

use std::fmt::Write;

use crate::checksum::Checksum;
use crate::record::{DecodeError, EncodeError, Record, MAX_SREC_PAYLOAD};

/// Decodes S-record text
pub struct SrecDecoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> SrecDecoder<'a> {
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

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        self.next_byte().ok_or(DecodeError::Truncated { offset: self.pos })
    }

    /// Read one ASCII hex nibble, skipping any byte that is not an
    /// uppercase hex digit. This tolerates stray whitespace inside a
    /// record, but a genuinely corrupt stream can desynchronise field
    /// boundaries rather than fail cleanly.
    fn read_hex_nibble(&mut self) -> Result<u8, DecodeError> {
        loop {
            match self.read_byte()? {
                c @ b'0'..=b'9' => return Ok(c - b'0'),
                c @ b'A'..=b'F' => return Ok(c - b'A' + 0x0A),
                _ => continue,
            }
        }
    }

    fn read_hex_byte(&mut self) -> Result<u8, DecodeError> {
        let high = self.read_hex_nibble()?;
        let low = self.read_hex_nibble()?;
        Ok(high << 4 | low)
    }

    fn read_hex_word(&mut self) -> Result<u16, DecodeError> {
        let high = self.read_hex_byte()?;
        let low = self.read_hex_byte()?;
        Ok(u16::from_be_bytes([high, low]))
    }

    /// Decode the next record.
    ///
    /// Returns `Ok(None)` on clean end of stream. Header and count
    /// records are decoded and checksum-verified like any other; callers
    /// converting to FLEX simply find no representation for them
    /// downstream.
    pub fn next_record(&mut self) -> Result<Option<Record>, DecodeError> {
        // Skip NUL, CR, LF between records. Anything else that is not
        // the start of a record is a framing error.
        loop {
            match self.next_byte() {
                None => return Ok(None),
                Some(b'S') => break,
                Some(0x00) | Some(0x0D) | Some(0x0A) => continue,
                Some(byte) => return Err(DecodeError::BadFraming { byte, offset: self.pos - 1 }),
            }
        }

        let type_offset = self.pos;
        let rectype = self.read_byte()?;

        let count = self.read_hex_byte()?;
        let mut checksum = Checksum::new();
        checksum.add(count);
        // Address and checksum bytes are included in the count
        let payload_len = usize::from(count.saturating_sub(3));

        let address = self.read_hex_word()?;
        checksum.add_word(address);

        let record = match rectype {
            b'1' => {
                let mut bytes = Vec::with_capacity(payload_len);
                for _ in 0..payload_len {
                    let byte = self.read_hex_byte()?;
                    checksum.add(byte);
                    bytes.push(byte);
                }
                Record::Data { address, bytes }
            }
            b'9' => Record::TransferAddress { address },
            b'0' => {
                let mut text = Vec::with_capacity(payload_len);
                for _ in 0..payload_len {
                    let byte = self.read_hex_byte()?;
                    checksum.add(byte);
                    text.push(byte);
                }
                Record::Header { text }
            }
            b'5' => {
                // The count value lives in the address field; any payload
                // is read only to keep the checksum honest
                for _ in 0..payload_len {
                    let byte = self.read_hex_byte()?;
                    checksum.add(byte);
                }
                Record::Count { value: address }
            }
            tag => return Err(DecodeError::UnrecognizedType { tag, offset: type_offset }),
        };

        let checksum_offset = self.pos;
        let received = self.read_hex_byte()?;
        if !checksum.verify(received) {
            return Err(DecodeError::ChecksumMismatch {
                computed: checksum.finish(),
                received,
                offset: checksum_offset,
            });
        }

        Ok(Some(record))
    }
}

/// Encodes records as S-record text
pub struct SrecEncoder {
    // Stateless; checksums are synthesized per record
}

impl SrecEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {}
    }

    /// Append one record as an S-record line to `out`.
    ///
    /// Hex digits are uppercase and zero-padded; every record ends with
    /// a line break. A null transfer address encodes as `S9030000FC`.
    pub fn encode(&self, record: &Record, out: &mut String) -> Result<(), EncodeError> {
        match record {
            Record::Data { address, bytes } => {
                self.encode_payload_record(out, '1', *address, bytes)?;
            }
            Record::Header { text } => {
                self.encode_payload_record(out, '0', 0x0000, text)?;
            }
            Record::TransferAddress { address } => {
                let mut checksum = Checksum::new();
                checksum.add(0x03);
                checksum.add_word(*address);
                let _ = write!(out, "S903{:04X}{:02X}\n", address, checksum.finish());
            }
            Record::Count { value } => {
                let mut checksum = Checksum::new();
                checksum.add(0x03);
                checksum.add_word(*value);
                let _ = write!(out, "S503{:04X}{:02X}\n", value, checksum.finish());
            }
        }
        Ok(())
    }

    fn encode_payload_record(
        &self,
        out: &mut String,
        type_digit: char,
        address: u16,
        payload: &[u8],
    ) -> Result<(), EncodeError> {
        if payload.len() > MAX_SREC_PAYLOAD {
            return Err(EncodeError::PayloadTooLong { len: payload.len(), max: MAX_SREC_PAYLOAD });
        }
        let count = payload.len() as u8 + 3;
        let mut checksum = Checksum::new();
        checksum.add(count);
        checksum.add_word(address);

        let _ = write!(out, "S{}{:02X}{:04X}", type_digit, count, address);
        for &byte in payload {
            checksum.add(byte);
            let _ = write!(out, "{:02X}", byte);
        }
        let _ = write!(out, "{:02X}\n", checksum.finish());
        Ok(())
    }
}

impl Default for SrecEncoder {
    fn default() -> Self {
        Self::new()
    }
}
