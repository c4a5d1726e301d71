pub mod ansi;
pub mod bitops;
pub mod calibration;
pub mod codec;
pub mod config;
pub mod frame;
#[cfg(feature = "store")]
pub mod store;

pub use ansi::{parse_ansi_matrix, AnsiWarning};
pub use calibration::{bit_index, blank_payloads, pixel_info, single_pixel_payload, PixelInfo};
pub use codec::{
    decode_batch, encode, matrix_to_queues, queues_to_matrix, queues_to_payloads, BitQueues,
    DecodeIssue, DecodeReport, Group, InputSource, Matrix, Payload, TypeMap,
};
pub use config::{PanelConfig, PixelType, Segment, COLS, ROWS};
pub use frame::{parse_legacy_frame, unwrap_frame, wrap_frame, wrap_legacy_frame};

use std::error::Error as StdError;
use std::fmt;

// Per-input decode problems are soft and reported through DecodeIssue
// instead of this type; see codec::decode_batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InternalError(String),
    ConfigurationError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InternalError(msg) => write!(f, "internal codec error: {}", msg),
            Error::ConfigurationError(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl StdError for Error {}

pub type Result<T> = std::result::Result<T, Error>;
