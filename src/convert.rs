//! Conversion driver
//!
//! One `Converter` runs one pipeline: FLEX decode feeding the S-record
//! encoder, or S-record decode feeding the FLEX encoder. The two
//! directions never run together and share no state. Output records
//! mirror the granularity of the input records; nothing is coalesced or
//! padded.

use std::io::{Read, Write};

use crate::flex::{FlexDecoder, FlexEncoder};
use crate::record::{ConvertError, Record};
use crate::srec::{SrecDecoder, SrecEncoder};

/// Which pipeline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// FLEX binary in, S-record text out
    FlexToSrec,
    /// S-record text in, FLEX binary out
    SrecToFlex,
}

/// Counts of records processed by one completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Data records decoded
    pub data_records: usize,
    /// Transfer address records decoded
    pub transfer_records: usize,
}

/// Drives one conversion run
///
/// The optional header text is emitted as an S0 record before a
/// FLEX-to-S-record run, conventionally the input's file name.
pub struct Converter {
    header: Option<String>,
}

impl Converter {
    /// Create a converter with no header record
    pub fn new() -> Self {
        Self { header: None }
    }

    /// Set the S0 header text for FLEX-to-S-record runs
    pub fn with_header(mut self, text: impl Into<String>) -> Self {
        self.header = Some(text.into());
        self
    }

    /// Run one conversion between streams.
    ///
    /// The input is read to memory so that decode errors can report exact
    /// byte offsets; the output is written and flushed before returning.
    pub fn convert<R: Read, W: Write>(
        &self,
        direction: Direction,
        mut reader: R,
        mut writer: W,
    ) -> Result<RunSummary, ConvertError> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;

        match direction {
            Direction::FlexToSrec => {
                let (text, summary) = self.flex_to_srec(&input)?;
                writer.write_all(text.as_bytes())?;
                writer.flush()?;
                Ok(summary)
            }
            Direction::SrecToFlex => {
                let (bytes, summary) = self.srec_to_flex(&input)?;
                writer.write_all(&bytes)?;
                writer.flush()?;
                Ok(summary)
            }
        }
    }

    /// Convert an in-memory FLEX load image to S-record text.
    ///
    /// After the records, the run is closed with an S5 record carrying
    /// the data record count, then the null transfer address sentinel if
    /// the input contained no transfer address of its own.
    pub fn flex_to_srec(&self, input: &[u8]) -> Result<(String, RunSummary), ConvertError> {
        let mut out = String::new();
        let encoder = SrecEncoder::new();

        if let Some(text) = &self.header {
            encoder.encode(&Record::Header { text: text.clone().into_bytes() }, &mut out)?;
        }

        let mut decoder = FlexDecoder::new(input);
        let mut summary = RunSummary::default();
        while let Some(record) = decoder.next_record()? {
            match record {
                Record::Data { .. } => summary.data_records += 1,
                Record::TransferAddress { .. } => summary.transfer_records += 1,
                _ => {}
            }
            encoder.encode(&record, &mut out)?;
        }

        encoder.encode(&Record::Count { value: summary.data_records as u16 }, &mut out)?;
        if summary.transfer_records == 0 {
            encoder.encode(&Record::TransferAddress { address: 0 }, &mut out)?;
        }

        Ok((out, summary))
    }

    /// Convert in-memory S-record text to a FLEX load image.
    ///
    /// Header and count records pass through as no-ops; a null transfer
    /// address is dropped by the FLEX encoder. No trailer is written.
    pub fn srec_to_flex(&self, input: &[u8]) -> Result<(Vec<u8>, RunSummary), ConvertError> {
        let mut out = Vec::new();
        let encoder = FlexEncoder::new();

        let mut decoder = SrecDecoder::new(input);
        let mut summary = RunSummary::default();
        while let Some(record) = decoder.next_record()? {
            match record {
                Record::Data { .. } => summary.data_records += 1,
                Record::TransferAddress { .. } => summary.transfer_records += 1,
                _ => {}
            }
            encoder.encode(&record, &mut out)?;
        }

        Ok((out, summary))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one conversion between streams with default settings.
///
/// Convenience wrapper around [`Converter::convert`] for callers that do
/// not need a header record.
pub fn convert<R: Read, W: Write>(
    direction: Direction,
    reader: R,
    writer: W,
) -> Result<RunSummary, ConvertError> {
    Converter::new().convert(direction, reader, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DecodeError;
    use std::fs;
    use std::io::Write as _;

    #[test]
    fn test_empty_flex_input() {
        // Header, zero count, null transfer address sentinel
        let (text, summary) = Converter::new().with_header("test.bin").flex_to_srec(&[]).unwrap();
        assert_eq!(text, "S00B0000746573742E62696ECD\nS5030000FC\nS9030000FC\n");
        assert_eq!(summary, RunSummary { data_records: 0, transfer_records: 0 });
    }

    #[test]
    fn test_flex_to_srec_with_transfer_address() {
        let input = [0x02, 0x10, 0x00, 0x03, 0xAA, 0xBB, 0xCC, 0x16, 0x20, 0x00];
        let (text, summary) = Converter::new().flex_to_srec(&input).unwrap();

        // One data record, one transfer address, one count, no sentinel
        assert_eq!(text, "S1061000AABBCCB8\nS9032000DC\nS5030001FB\n");
        assert_eq!(summary, RunSummary { data_records: 1, transfer_records: 1 });
    }

    #[test]
    fn test_flex_to_srec_without_transfer_address() {
        let input = [0x02, 0x10, 0x00, 0x01, 0x42];
        let (text, summary) = Converter::new().flex_to_srec(&input).unwrap();

        assert!(text.ends_with("S5030001FB\nS9030000FC\n"));
        assert_eq!(summary, RunSummary { data_records: 1, transfer_records: 0 });
    }

    #[test]
    fn test_flex_to_srec_reports_offset() {
        let input = [0x02, 0x10, 0x00, 0x01, 0x42, 0x00, 0x7F];
        let err = Converter::new().flex_to_srec(&input).unwrap_err();
        assert_eq!(err.offset(), Some(6));
        assert!(matches!(
            err,
            ConvertError::Decode(DecodeError::UnrecognizedType { tag: 0x7F, offset: 6 })
        ));
    }

    #[test]
    fn test_srec_to_flex() {
        let input = b"S00700007465737438\nS1061000AABBCCB8\nS9032000DC\nS5030001FB\n";
        let (bytes, summary) = Converter::new().srec_to_flex(input).unwrap();

        // Header and count vanish; data and transfer address survive
        assert_eq!(bytes, vec![0x02, 0x10, 0x00, 0x03, 0xAA, 0xBB, 0xCC, 0x16, 0x20, 0x00]);
        assert_eq!(summary, RunSummary { data_records: 1, transfer_records: 1 });
    }

    #[test]
    fn test_srec_to_flex_drops_null_sentinel() {
        let input = b"S1061000AABBCCB8\nS5030001FB\nS9030000FC\n";
        let (bytes, summary) = Converter::new().srec_to_flex(input).unwrap();

        assert_eq!(bytes, vec![0x02, 0x10, 0x00, 0x03, 0xAA, 0xBB, 0xCC]);
        // The null transfer address was still decoded and counted
        assert_eq!(summary.transfer_records, 1);
    }

    #[test]
    fn test_srec_to_flex_rejects_unsupported_type() {
        let input = b"S1061000AABBCCB8\nS705000010EAFF\nS1061000AABBCCB8\n";
        let err = Converter::new().srec_to_flex(input).unwrap_err();
        // Offset of the '7' type byte, one past the 'S' on the second line
        assert_eq!(err.offset(), Some(18));
    }

    #[test]
    fn test_srec_to_flex_checksum_failure_is_terminal() {
        let input = b"S1061000AABBCC00\nS9032000DC\n";
        let err = Converter::new().srec_to_flex(input).unwrap_err();
        assert!(matches!(err, ConvertError::Decode(DecodeError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_round_trip_through_both_formats() {
        let original = [
            0x02, 0xC1, 0x00, 0x04, 0xDE, 0xAD, 0xBE, 0xEF,
            0x02, 0xC2, 0x00, 0x00,
            0x02, 0xC3, 0x00, 0x01, 0x5A,
            0x16, 0xC1, 0x00,
        ];
        let converter = Converter::new().with_header("image.bin");
        let (text, _) = converter.flex_to_srec(&original).unwrap();
        let (bytes, summary) = converter.srec_to_flex(text.as_bytes()).unwrap();

        assert_eq!(bytes, original);
        assert_eq!(summary, RunSummary { data_records: 3, transfer_records: 1 });
    }

    #[test]
    fn test_filler_does_not_change_output() {
        let plain = [0x02, 0x10, 0x00, 0x01, 0x42, 0x16, 0x20, 0x00];
        let padded = [0x00, 0x02, 0x10, 0x00, 0x01, 0x42, 0x00, 0x00, 0x16, 0x20, 0x00, 0x00];
        let converter = Converter::new();
        assert_eq!(
            converter.flex_to_srec(&plain).unwrap(),
            converter.flex_to_srec(&padded).unwrap()
        );
    }

    #[test]
    fn test_convert_between_files() {
        let dir = tempfile::tempdir().unwrap();
        let flex_path = dir.path().join("image.bin");
        let srec_path = dir.path().join("image.s19");

        let mut flex_file = fs::File::create(&flex_path).unwrap();
        flex_file.write_all(&[0x02, 0x10, 0x00, 0x01, 0x42, 0x16, 0x20, 0x00]).unwrap();
        drop(flex_file);

        let converter = Converter::new().with_header("image.bin");
        let summary = converter
            .convert(
                Direction::FlexToSrec,
                fs::File::open(&flex_path).unwrap(),
                fs::File::create(&srec_path).unwrap(),
            )
            .unwrap();
        assert_eq!(summary, RunSummary { data_records: 1, transfer_records: 1 });

        let back_path = dir.path().join("back.bin");
        convert(
            Direction::SrecToFlex,
            fs::File::open(&srec_path).unwrap(),
            fs::File::create(&back_path).unwrap(),
        )
        .unwrap();

        assert_eq!(fs::read(&back_path).unwrap(), vec![0x02, 0x10, 0x00, 0x01, 0x42, 0x16, 0x20, 0x00]);
    }
}
