//! Binary-to-text codecs.
//!
//! Provides the Base64 codec used to embed captcha images in data URIs.

pub mod base64;

pub use self::base64::{DecodeMode, decode, decode_trimmed, decode_with, encode, encoded_len};
