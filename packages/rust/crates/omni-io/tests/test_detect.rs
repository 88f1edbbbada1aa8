//! Tests for detect module - binary, encoding and line-ending detection.

use omni_io::{IoError, LineEnding, decode_buffer, decode_utf8, is_binary};

#[test]
fn test_binary_detection() {
    assert!(is_binary(b"\x00\x01\x02\x03"));
    assert!(!is_binary(b"import os\n"));
    assert!(!is_binary(b""));
}

#[test]
fn test_decode_binary() {
    let result = decode_buffer(b"\x00\x01\x02".to_vec());
    assert!(matches!(result, Err(IoError::BinaryFile)));
}

#[test]
fn test_decode_utf8_lossy() {
    let result = decode_buffer(vec![0x48, 0x65, 0x6c, 0xff, 0x6f]);
    assert!(result.is_ok());
}

#[test]
fn test_line_ending_roundtrip() {
    let crlf = "def f():\r\n    return 1\r\n";
    assert_eq!(LineEnding::at(crlf, 0), LineEnding::Crlf);
    let normalized = LineEnding::normalize(crlf);
    assert_eq!(normalized, "def f():\n    return 1\n");
    assert_eq!(LineEnding::Crlf.apply(&normalized), crlf);
    assert_eq!(LineEnding::Preserve.apply(crlf), crlf);
}

#[test]
fn test_strict_decode_rejects_latin1() {
    assert!(matches!(
        decode_utf8(b"name = 'caf\xe9'\n".to_vec()),
        Err(IoError::Encoding)
    ));
    assert!(matches!(
        decode_utf8(vec![0x00, 0x01]),
        Err(IoError::BinaryFile)
    ));
}
