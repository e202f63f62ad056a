//! Generated captcha value.

use crate::captcha::ImageType;
use crate::codec::base64;

/// A plaintext code paired with its rendered, encoded image.
///
/// Equality and hashing cover the code, the exact image bytes, and the type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Captcha {
    code: String,
    image_bytes: Vec<u8>,
    image_type: ImageType,
}

impl Captcha {
    #[must_use]
    pub fn new(code: impl Into<String>, image_bytes: Vec<u8>, image_type: ImageType) -> Self {
        Self {
            code: code.into(),
            image_bytes,
            image_type,
        }
    }

    /// Expected answer.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Encoded image in the format given by [`Captcha::image_type`].
    #[must_use]
    pub fn image_bytes(&self) -> &[u8] {
        &self.image_bytes
    }

    #[must_use]
    pub const fn image_type(&self) -> ImageType {
        self.image_type
    }

    /// Formats the image as `data:<mime>;base64,<payload>`.
    #[must_use]
    pub fn to_image_data_uri(&self) -> String {
        let mime = self.image_type.mime_type();
        let mut uri = String::with_capacity(
            "data:;base64,".len() + mime.len() + base64::encoded_len(self.image_bytes.len()),
        );
        uri.push_str("data:");
        uri.push_str(mime);
        uri.push_str(";base64,");
        uri.push_str(&base64::encode(&self.image_bytes));
        uri
    }

    #[must_use]
    pub fn into_parts(self) -> (String, Vec<u8>, ImageType) {
        (self.code, self.image_bytes, self.image_type)
    }
}
