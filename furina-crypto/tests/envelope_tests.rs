use furina_crypto::{DecodeFailure, Envelope, EnvelopeCodec, KdfParams, MessageMeta, open, seal};
use pretty_assertions::assert_eq;

fn codec() -> EnvelopeCodec {
    EnvelopeCodec::new(KdfParams::with_iterations(1_000)).unwrap()
}

/// Produced by an independent WebCrypto-compatible implementation with
/// 1,000 PBKDF2 iterations and paraphrase "furina".
const FOREIGN_TOKEN: &str = "eyJ2IjoxLCJzYWx0IjoiQUFFQ0F3UUZCZ2NJQ1FvTERBME9Edz09IiwiaXYiOiJaR1ZtWjJocGFtdHNiVzV2IiwiY3QiOiJoRmtRSm9ndXF4VXdRdVV5V3RoV2YwZkx4a2J3K0xtSGFxb2s2NE9UcXV1ZUtMWmlhWUt3RmxTWDF3PT0iLCJ0cyI6IjIwMjUtMDMtMTRUMDk6MjY6NTMuNTg5WiIsInNlbmRlciI6Im1lIn0=";

/// Same message without a sender field.
const FOREIGN_TOKEN_NO_SENDER: &str = "eyJ2IjoxLCJzYWx0IjoiQUFFQ0F3UUZCZ2NJQ1FvTERBME9Edz09IiwiaXYiOiJaR1ZtWjJocGFtdHNiVzV2IiwiY3QiOiJoRmtRSm9ndXF4VXdRdVV5V3RoV2YwZkx4a2J3K0xtSGFxb2s2NE9UcXV1ZUtMWmlhWUt3RmxTWDF3PT0iLCJ0cyI6IjIwMjUtMDMtMTRUMDk6MjY6NTMuNTg5WiJ9";

// ── Round trip ──

#[test]
fn hello_furina_scenario_with_default_iterations() {
    let token = seal("hello", "furina", Some("me")).unwrap();

    let msg = open(&token, "furina").unwrap();
    assert_eq!(msg.text, "hello");
    assert_eq!(msg.meta.sender.as_deref(), Some("me"));
    assert_eq!(msg.meta.version, 1);

    assert_eq!(open(&token, "wrong-pass"), Err(DecodeFailure::AuthenticationFailed));
}

#[test]
fn empty_plaintext_roundtrips() {
    let token = codec().seal("", "furina", None).unwrap();
    let msg = codec().open(&token, "furina").unwrap();
    assert_eq!(msg.text, "");
    assert_eq!(msg.meta.sender, None);
}

#[test]
fn multibyte_plaintext_roundtrips() {
    let text = "フリーナ 🌊 — déjà vu";
    let token = codec().seal(text, "パスフレーズ", Some("me")).unwrap();
    assert_eq!(codec().open(&token, "パスフレーズ").unwrap().text, text);
}

#[test]
fn empty_paraphrase_is_legal() {
    let token = codec().seal("open secret", "", None).unwrap();
    assert_eq!(codec().open(&token, "").unwrap().text, "open secret");
    assert_eq!(
        codec().open(&token, " "),
        Err(DecodeFailure::AuthenticationFailed)
    );
}

#[test]
fn large_plaintext_roundtrips() {
    let text = "x".repeat(64 * 1024);
    let token = codec().seal(&text, "furina", None).unwrap();
    assert_eq!(codec().open(&token, "furina").unwrap().text, text);
}

// ── Wrong key / iteration mismatch ──

#[test]
fn wrong_paraphrase_is_authentication_failure() {
    let token = codec().seal("secret", "correct horse", None).unwrap();
    assert_eq!(
        codec().open(&token, "battery staple"),
        Err(DecodeFailure::AuthenticationFailed)
    );
}

#[test]
fn mismatched_iteration_count_cannot_open() {
    let token = codec().seal("secret", "furina", None).unwrap();
    let other = EnvelopeCodec::new(KdfParams::with_iterations(1_001)).unwrap();
    assert_eq!(
        other.open(&token, "furina"),
        Err(DecodeFailure::AuthenticationFailed)
    );
}

// ── Freshness ──

#[test]
fn each_seal_uses_fresh_salt_iv_and_ciphertext() {
    let t1 = codec().seal("same", "same", Some("me")).unwrap();
    let t2 = codec().seal("same", "same", Some("me")).unwrap();
    assert_ne!(t1, t2);

    let e1 = Envelope::from_token(&t1).unwrap();
    let e2 = Envelope::from_token(&t2).unwrap();
    assert_ne!(e1.salt, e2.salt);
    assert_ne!(e1.iv, e2.iv);
    assert_ne!(e1.ciphertext, e2.ciphertext);

    assert_eq!(codec().open(&t1, "same").unwrap().text, "same");
    assert_eq!(codec().open(&t2, "same").unwrap().text, "same");
}

// ── Malformed input ──

#[test]
fn non_base64_token_is_malformed() {
    assert!(matches!(
        codec().open("not-base64!!!", "any"),
        Err(DecodeFailure::MalformedToken(_))
    ));
}

#[test]
fn empty_object_is_malformed() {
    // base64("{}")
    assert!(matches!(
        codec().open("e30=", "any"),
        Err(DecodeFailure::MalformedToken(_))
    ));
}

#[test]
fn assorted_garbage_never_panics() {
    let inputs = [
        "",
        "   ",
        "bnVsbA==",         // null
        "W10=",             // []
        "ImhpIg==",         // "hi"
        "eyJzYWx0IjoxfQ==", // {"salt":1}
        "eyJ2IjoxLCJzYWx0IjoiIiwiaXYiOiIiLCJjdCI6IiJ9", // empty fields
        "////",
    ];
    for input in inputs {
        let result = codec().open(input, "furina");
        assert!(
            matches!(result, Err(DecodeFailure::MalformedToken(_))),
            "{input:?} should be malformed, got {result:?}"
        );
    }
}

#[test]
fn surrounding_whitespace_is_tolerated() {
    let token = codec().seal("hi", "furina", None).unwrap();
    let padded = format!("  {token}\n");
    assert_eq!(codec().open(&padded, "furina").unwrap().text, "hi");
}

// ── Interop ──

#[test]
fn opens_token_from_browser_client() {
    let msg = codec().open(FOREIGN_TOKEN, "furina").unwrap();
    assert_eq!(msg.text, "hello from the browser 🌊");
    assert_eq!(
        msg.meta,
        MessageMeta {
            ts: Some("2025-03-14T09:26:53.589Z".into()),
            sender: Some("me".into()),
            version: 1,
        }
    );
    assert!(msg.meta.timestamp().is_some());
}

#[test]
fn browser_token_without_sender_has_none() {
    let msg = codec().open(FOREIGN_TOKEN_NO_SENDER, "furina").unwrap();
    assert_eq!(msg.meta.sender, None);
}

#[test]
fn browser_token_rejects_wrong_paraphrase() {
    assert_eq!(
        codec().open(FOREIGN_TOKEN, "Furina"),
        Err(DecodeFailure::AuthenticationFailed)
    );
}

// ── Concurrency ──

#[test]
fn codec_is_shareable_across_threads() {
    let codec = codec();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let text = format!("message {i}");
                let token = codec.seal(&text, "furina", None).unwrap();
                assert_eq!(codec.open(&token, "furina").unwrap().text, text);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

// Property-based tests
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn seal_open_always_roundtrips(
            text in ".{0,200}",
            paraphrase in ".{0,40}",
            sender in proptest::option::of("[a-z]{1,8}"),
        ) {
            let token = codec().seal(&text, &paraphrase, sender.as_deref()).unwrap();
            let msg = codec().open(&token, &paraphrase).unwrap();
            prop_assert_eq!(msg.text, text);
            prop_assert_eq!(msg.meta.sender, sender);
        }

        #[test]
        fn different_paraphrase_always_rejected(
            text in ".{0,64}",
            k1 in "[a-zA-Z0-9]{1,16}",
            k2 in "[a-zA-Z0-9]{1,16}",
        ) {
            prop_assume!(k1 != k2);
            let token = codec().seal(&text, &k1, None).unwrap();
            prop_assert_eq!(codec().open(&token, &k2), Err(DecodeFailure::AuthenticationFailed));
        }

        #[test]
        fn arbitrary_strings_never_panic(input in ".{0,128}") {
            let _ = codec().open(&input, "furina");
        }
    }
}
