use glyphgate::codec::base64::{self, DecodeMode};
use glyphgate::{Captcha, CaptchaError, CaptchaGenerator, ImageType};

#[test]
fn test_known_vector_round_trip() {
    let plain = b"test~qwerty~!@#~123";
    let encoded = base64::encode(plain);

    assert_eq!(encoded, "dGVzdH5xd2VydHl+IUAjfjEyMw==");
    assert_eq!(base64::decode(&encoded).unwrap(), plain);
}

#[test]
fn test_invalid_inputs() {
    for input in ["123", "@@@@", "Zm9v!A==", "Zm9vY"] {
        let err = base64::decode(input).unwrap_err();
        assert!(
            matches!(err, CaptchaError::InvalidEncoding(_)),
            "{input:?} gave {err:?}"
        );
    }
}

#[test]
fn test_modes_differ_only_on_trailing_zeros() {
    let payloads: [&[u8]; 4] = [b"abc", b"ab\0c", b"abc\0", b"\0\0\0\0"];
    for payload in payloads {
        let encoded = base64::encode(payload);
        let exact = base64::decode_with(&encoded, DecodeMode::Exact).unwrap();
        let trimmed = base64::decode_with(&encoded, DecodeMode::TrimTrailingZeros).unwrap();

        assert_eq!(exact, payload);
        let expected_len = payload.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        assert_eq!(trimmed, &payload[..expected_len]);
    }
}

#[test]
fn test_data_uri_payload_decodes_to_image_bytes() {
    let captcha = CaptchaGenerator::default_generator().generate().unwrap();
    let uri = captcha.to_image_data_uri();

    let payload = uri
        .strip_prefix("data:image/png;base64,")
        .expect("png data URI prefix");
    assert_eq!(base64::decode(payload).unwrap(), captcha.image_bytes());
}

#[test]
fn test_data_uri_format_for_every_type() {
    let bytes = vec![0xFF, 0xD8, 0xFF, 0x00];
    for ty in ImageType::ALL {
        let captcha = Captcha::new("ACDE", bytes.clone(), ty);
        assert_eq!(
            captcha.to_image_data_uri(),
            format!("data:{};base64,/9j/AA==", ty.mime_type())
        );
    }
}
