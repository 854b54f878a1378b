#![doc = include_str!("../README.md")]

mod classify;
mod error;
mod scalar;
mod transcode;

pub use classify::{
    Category, MAX_CODE_POINT, classify, classify_code_point, is_noncharacter, is_surrogate,
};
pub use error::TranscodeError;
pub use scalar::{
    decode_surrogate_pair, encode_surrogate_pair, encode_utf8_into, is_high_surrogate,
    is_low_surrogate, push_utf8, utf8_len,
};
pub use transcode::{
    Utf8Scalars, Utf16LeScalars, Utf16Scalars, decode_utf8, decode_utf16, decode_utf16le,
    encode_utf8, encode_utf16, switch_utf16_to_8, utf8_len_of_utf16,
};
