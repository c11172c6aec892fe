use sestring::{DecodeError, RawEncodable, SeString, expr::MAX_NESTING};

#[test]
fn embedded_nul_in_string_expression() {
    // <string("a\0")>
    let bytes = [0x02, 0x29, 0x05, 0xFF, 0x03, b'a', 0x00, 0x03];
    assert_eq!(
        SeString::decode(&bytes),
        Err(DecodeError::EmbeddedNul { offset: 1 })
    );
}

#[test]
fn nul_type_byte_in_body() {
    let bytes = [0x02, 0x20, 0x02, 0x00, 0x03];
    assert_eq!(SeString::decode(&bytes), Err(DecodeError::NulTypeByte));
}

#[test]
fn reserved_type_byte_in_body() {
    let bytes = [0x02, 0x20, 0x02, 0xE6, 0x03];
    assert_eq!(SeString::decode(&bytes), Err(DecodeError::InvalidTypeByte(0xE6)));
}

#[test]
fn truncated_frames() {
    for bytes in [
        &[0x02][..],
        &[0x02, 0x20],
        &[0x02, 0x20, 0x05, 0x02],
        &[0x02, 0x20, 0x02, 0x02],
    ] {
        let err = SeString::decode(bytes).unwrap_err();
        assert!(
            err.is_unexpected_end() || err.is_missing_end_marker(),
            "{bytes:?}: {err}"
        );
    }
}

#[test]
fn body_length_is_authoritative() {
    // The declared body stops after two fields: the third one sits where the
    // end marker is expected.
    let bytes = [0x02, 0x08, 0x03, 0x02, 0x02, 0x02, 0x03];
    assert_eq!(
        SeString::decode(&bytes),
        Err(DecodeError::MissingEndMarker { code: 0x08, found: Some(0x02) })
    );

    // Inside its frame, a body that does not fit the layout is kept as is.
    let bytes = [0x02, 0x08, 0x03, 0x02, 0x02, 0x03];
    let string = SeString::decode(&bytes).expect("decodes");
    assert_eq!(string.encode_vec(), bytes);
}

#[test]
fn deeply_nested_strings_are_rejected() {
    // Build <string(<string(...)>)> deeper than the decoder accepts.
    let mut bytes: Vec<u8> = b"x".to_vec();
    for _ in 0..=MAX_NESTING {
        let mut body = vec![0xFF];
        sestring::encoding::integer::encode_u32(bytes.len() as u32, &mut |b| {
            body.extend_from_slice(b)
        });
        body.extend_from_slice(&bytes);

        let mut frame = vec![0x02, 0x29];
        sestring::encoding::integer::encode_u32(body.len() as u32, &mut |b| {
            frame.extend_from_slice(b)
        });
        frame.extend_from_slice(&body);
        frame.push(0x03);
        bytes = frame;
    }
    let err = SeString::decode(&bytes).unwrap_err();
    assert_eq!(err, DecodeError::NestingTooDeep { max: MAX_NESTING });
    assert!(err.to_string().starts_with("malformed macro data"));
}

#[test]
fn non_minimal_frame_length() {
    // newline whose empty body length is spelled `F0 00`.
    let bytes = b"a\x02\x10\xF0\x00\x03";
    let err = SeString::decode(bytes).unwrap_err();
    assert_eq!(err, DecodeError::NonMinimalLength { code: 0x10 });
    assert!(err.to_string().starts_with("malformed macro data"));
}
