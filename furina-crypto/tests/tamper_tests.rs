//! Adversarial tests for sealed tokens.
//!
//! Flips single bits in each authenticated field, splices fields between
//! tokens, and truncates ciphertext. Every modification must be rejected
//! with `AuthenticationFailed` and must never yield a different plaintext.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use furina_crypto::{DecodeFailure, EnvelopeCodec, KdfParams};
use serde_json::Value;

const PARAPHRASE: &str = "furina";

fn codec() -> EnvelopeCodec {
    EnvelopeCodec::new(KdfParams::with_iterations(200)).unwrap()
}

fn inner(token: &str) -> Value {
    serde_json::from_slice(&STANDARD.decode(token).unwrap()).unwrap()
}

fn outer(json: &Value) -> String {
    STANDARD.encode(serde_json::to_vec(json).unwrap())
}

fn field_bytes(json: &Value, field: &str) -> Vec<u8> {
    STANDARD.decode(json[field].as_str().unwrap()).unwrap()
}

fn with_field(json: &Value, field: &str, bytes: &[u8]) -> String {
    let mut json = json.clone();
    json[field] = Value::String(STANDARD.encode(bytes));
    outer(&json)
}

fn assert_every_bit_flip_rejected(field: &str) {
    let token = codec().seal("hello", PARAPHRASE, Some("me")).unwrap();
    let json = inner(&token);
    let original = field_bytes(&json, field);

    for byte in 0..original.len() {
        for bit in 0..8 {
            let mut tampered = original.clone();
            tampered[byte] ^= 1 << bit;
            let result = codec().open(&with_field(&json, field, &tampered), PARAPHRASE);
            assert_eq!(
                result,
                Err(DecodeFailure::AuthenticationFailed),
                "flip of bit {bit} in byte {byte} of `{field}` was not detected"
            );
        }
    }
}

// ── Single bit flips ──

#[test]
fn every_bit_flip_in_ciphertext_detected() {
    assert_every_bit_flip_rejected("ct");
}

#[test]
fn every_bit_flip_in_iv_detected() {
    assert_every_bit_flip_rejected("iv");
}

#[test]
fn every_bit_flip_in_salt_detected() {
    assert_every_bit_flip_rejected("salt");
}

#[test]
fn untouched_token_still_opens() {
    let token = codec().seal("hello", PARAPHRASE, Some("me")).unwrap();
    let json = inner(&token);
    let ct = field_bytes(&json, "ct");
    let rebuilt = with_field(&json, "ct", &ct);
    assert_eq!(codec().open(&rebuilt, PARAPHRASE).unwrap().text, "hello");
}

// ── Splicing ──

#[test]
fn ciphertext_from_other_token_rejected() {
    let a = inner(&codec().seal("message a", PARAPHRASE, None).unwrap());
    let b = inner(&codec().seal("message b", PARAPHRASE, None).unwrap());
    let spliced = with_field(&a, "ct", &field_bytes(&b, "ct"));
    assert_eq!(
        codec().open(&spliced, PARAPHRASE),
        Err(DecodeFailure::AuthenticationFailed)
    );
}

#[test]
fn iv_from_other_token_rejected() {
    let a = inner(&codec().seal("message a", PARAPHRASE, None).unwrap());
    let b = inner(&codec().seal("message b", PARAPHRASE, None).unwrap());
    let spliced = with_field(&a, "iv", &field_bytes(&b, "iv"));
    assert_eq!(
        codec().open(&spliced, PARAPHRASE),
        Err(DecodeFailure::AuthenticationFailed)
    );
}

// ── Truncation and extension ──

#[test]
fn truncated_ciphertext_rejected() {
    let json = inner(&codec().seal("a longer message body", PARAPHRASE, None).unwrap());
    let ct = field_bytes(&json, "ct");
    for cut in 1..=4 {
        let result = codec().open(&with_field(&json, "ct", &ct[..ct.len() - cut]), PARAPHRASE);
        assert_eq!(result, Err(DecodeFailure::AuthenticationFailed));
    }
}

#[test]
fn appended_ciphertext_rejected() {
    let json = inner(&codec().seal("hello", PARAPHRASE, None).unwrap());
    let mut ct = field_bytes(&json, "ct");
    ct.push(0x00);
    assert_eq!(
        codec().open(&with_field(&json, "ct", &ct), PARAPHRASE),
        Err(DecodeFailure::AuthenticationFailed)
    );
}

#[test]
fn ciphertext_shorter_than_tag_is_malformed() {
    let json = inner(&codec().seal("hello", PARAPHRASE, None).unwrap());
    let result = codec().open(&with_field(&json, "ct", &[0u8; 15]), PARAPHRASE);
    assert!(matches!(result, Err(DecodeFailure::MalformedToken(_))));
}

// ── Unauthenticated metadata ──

#[test]
fn metadata_edits_do_not_change_plaintext() {
    let mut json = inner(&codec().seal("hello", PARAPHRASE, Some("me")).unwrap());
    json["sender"] = Value::String("mallory".into());
    json["ts"] = Value::String("1999-01-01T00:00:00.000Z".into());

    let msg = codec().open(&outer(&json), PARAPHRASE).unwrap();
    assert_eq!(msg.text, "hello");
    assert_eq!(msg.meta.sender.as_deref(), Some("mallory"));
}
