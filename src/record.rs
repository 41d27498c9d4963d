//! Record data structures and error types

// FLEX binary format constants
pub const FLEX_DATA_TAG: u8 = 0x02;
pub const FLEX_TRANSFER_TAG: u8 = 0x16;

/// Largest payload a FLEX data record can carry (8-bit count field).
pub const MAX_FLEX_PAYLOAD: usize = 255;
/// Largest payload an S-record can carry: the count byte covers the two
/// address bytes and the checksum byte as well as the payload.
pub const MAX_SREC_PAYLOAD: usize = 252;

/// One decoded record from either format.
///
/// `Header` and `Count` exist only in the S-record representation; the
/// FLEX encoder drops them. Clean end of stream is not a variant — decoders
/// return `Ok(None)` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Machine code or data to be loaded at an address
    Data { address: u16, bytes: Vec<u8> },
    /// Entry point at which execution begins after loading
    TransferAddress { address: u16 },
    /// S0 header record, carrying free-form identification text
    Header { text: Vec<u8> },
    /// S5 record count, emitted once at the end of a FLEX-to-S-record run
    Count { value: u16 },
}

impl Record {
    /// True for the record kinds the FLEX binary format can represent.
    pub fn has_flex_representation(&self) -> bool {
        matches!(self, Record::Data { .. } | Record::TransferAddress { .. })
    }
}

/// Error type for record decoding
///
/// Every variant carries the byte offset in the source at which the
/// problem was detected. All decode errors are terminal for a run:
/// record boundaries cannot be trusted once one frame is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A record tag or S-record type digit outside the supported set
    UnrecognizedType { tag: u8, offset: usize },

    /// A byte between S-records that is neither filler nor 'S'
    BadFraming { byte: u8, offset: usize },

    /// Transmitted S-record checksum does not close the sum to 0xFF
    ChecksumMismatch { computed: u8, received: u8, offset: usize },

    /// Stream ended in the middle of a record
    Truncated { offset: usize },
}

impl DecodeError {
    /// Byte offset in the source stream at the point of failure.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::UnrecognizedType { offset, .. }
            | DecodeError::BadFraming { offset, .. }
            | DecodeError::ChecksumMismatch { offset, .. }
            | DecodeError::Truncated { offset } => *offset,
        }
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::UnrecognizedType { tag, offset } => {
                write!(f, "Unrecognised record type {:02X} at offset {:04X}", tag, offset)
            }
            DecodeError::BadFraming { byte, offset } => {
                write!(f, "Unexpected byte {:02X} between records at offset {:04X}", byte, offset)
            }
            DecodeError::ChecksumMismatch { computed, received, offset } => {
                write!(
                    f,
                    "Checksum mismatch at offset {:04X}: computed {:02X}, received {:02X}",
                    offset, computed, received
                )
            }
            DecodeError::Truncated { offset } => {
                write!(f, "Input truncated mid-record at offset {:04X}", offset)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Error type for record encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Payload does not fit the target format's count field
    PayloadTooLong { len: usize, max: usize },
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::PayloadTooLong { len, max } => {
                write!(f, "Record payload of {} bytes exceeds the format maximum of {}", len, max)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Error type for a whole conversion run
#[derive(Debug)]
pub enum ConvertError {
    /// A malformed record in the input
    Decode(DecodeError),

    /// A record that cannot be represented in the output format
    Encode(EncodeError),

    /// Failure reading the input or writing the output
    Io(String),
}

impl ConvertError {
    /// Byte offset in the source stream, when the failure has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ConvertError::Decode(err) => Some(err.offset()),
            ConvertError::Encode(_) | ConvertError::Io(_) => None,
        }
    }
}

impl std::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertError::Decode(err) => write!(f, "{}", err),
            ConvertError::Encode(err) => write!(f, "{}", err),
            ConvertError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Decode(err) => Some(err),
            ConvertError::Encode(err) => Some(err),
            ConvertError::Io(_) => None,
        }
    }
}

impl From<DecodeError> for ConvertError {
    fn from(err: DecodeError) -> Self {
        ConvertError::Decode(err)
    }
}

impl From<EncodeError> for ConvertError {
    fn from(err: EncodeError) -> Self {
        ConvertError::Encode(err)
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Io(err.to_string())
    }
}
