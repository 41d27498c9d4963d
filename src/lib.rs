//! # flex-srec
//!
//! Conversion between the FLEX binary load format and Motorola S-record
//! text, plus a blank FLEX disk image builder.
//!
//! ## FLEX binary load format
//!
//! A load file is a sequence of records with no stored checksum:
//!
//! ```text
//! [tag:1][address:2 BE][count:1][payload:count]   tag 0x02, data
//! [tag:1][address:2 BE]                           tag 0x16, transfer address
//! ```
//!
//! Zero bytes between records are filler; the stream simply ends.
//!
//! ## Motorola S-record format
//!
//! One ASCII line per record, uppercase hex:
//!
//! ```text
//! S1 06 1000 AABBCC B8
//! ^  ^  ^    ^      ^-- one's-complement checksum
//! |  |  |    +--------- payload
//! |  |  +-------------- load address
//! |  +----------------- byte count: address + payload + checksum
//! +-------------------- type: S0 header, S1 data, S5 count, S9 transfer
//! ```
//!
//! The checksum is the one's complement of the low byte of the sum over
//! count, address and payload bytes; NUL, CR and LF between records are
//! filler. The 24- and 32-bit address types (S2/S3/S7/S8) are rejected.
//!
//! ## Conversion
//!
//! [`Converter`] runs one pipeline per call and reports counts of the
//! records it processed:
//!
//! ```
//! use flex_srec::{Converter, RunSummary};
//!
//! let flex = [0x02, 0x10, 0x00, 0x03, 0xAA, 0xBB, 0xCC, 0x16, 0x20, 0x00];
//! let (text, summary) = Converter::new().flex_to_srec(&flex)?;
//! assert_eq!(text, "S1061000AABBCCB8\nS9032000DC\nS5030001FB\n");
//! assert_eq!(summary, RunSummary { data_records: 1, transfer_records: 1 });
//! # Ok::<(), flex_srec::ConvertError>(())
//! ```
//!
//! Output records mirror the granularity of the input; the result may
//! benefit from srec_cat(1) or similar if maximally-sized records are
//! wanted. Decode errors carry the byte offset at which the input went
//! wrong.

pub mod checksum;
pub mod convert;
pub mod flex;
pub mod fsimage;
pub mod record;
pub mod srec;

pub use checksum::Checksum;
pub use convert::{convert, Converter, Direction, RunSummary};
pub use flex::{FlexDecoder, FlexEncoder};
pub use fsimage::{ImageBuilder, ImageError, SECTOR_SIZE};
pub use record::{ConvertError, DecodeError, EncodeError, Record};
pub use srec::{SrecDecoder, SrecEncoder};
