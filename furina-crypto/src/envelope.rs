//! Message envelopes and their token form.
//!
//! A token is `base64(json)` where the JSON record carries base64 byte
//! fields:
//!
//! ```text
//! { "v": 1, "salt": b64(16), "iv": b64(12), "ct": b64(ciphertext || tag),
//!   "ts": "2025-01-01T00:00:00.000Z", "sender": "me" }
//! ```
//!
//! `sender` is omitted when absent. Every seal draws a fresh salt and IV;
//! every open derives the key from the envelope's own salt.

use crate::cipher::{self, IV_SIZE, Iv, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult, DecodeFailure};
use crate::key::{KdfParams, SALT_SIZE, Salt, derive_key};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// The only envelope format version this codec reads or writes.
pub const ENVELOPE_VERSION: u32 = 1;

/// Parsed envelope record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub version: u32,
    pub salt: Salt,
    pub iv: Iv,
    /// Ciphertext with the GCM tag appended.
    pub ciphertext: Vec<u8>,
    /// ISO-8601 UTC creation time. Advisory only.
    pub timestamp: Option<String>,
    pub sender: Option<String>,
}

/// JSON shape inside the outer base64 layer.
#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    v: Option<u64>,
    salt: Option<String>,
    iv: Option<String>,
    ct: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender: Option<String>,
}

impl Envelope {
    /// Serializes to the single opaque transport string.
    pub fn to_token(&self) -> CryptoResult<String> {
        let wire = WireEnvelope {
            v: Some(u64::from(self.version)),
            salt: Some(STANDARD.encode(self.salt.as_bytes())),
            iv: Some(STANDARD.encode(self.iv.as_bytes())),
            ct: Some(STANDARD.encode(&self.ciphertext)),
            ts: self.timestamp.clone(),
            sender: self.sender.clone(),
        };
        let json = serde_json::to_vec(&wire)?;
        Ok(STANDARD.encode(json))
    }

    /// Parses a token from an untrusted source. Never panics.
    pub fn from_token(token: &str) -> Result<Self, DecodeFailure> {
        let json = STANDARD
            .decode(token.trim())
            .map_err(|_| DecodeFailure::malformed("token is not valid base64"))?;
        let wire: WireEnvelope = serde_json::from_slice(&json)
            .map_err(|e| DecodeFailure::malformed(format!("token is not an envelope: {e}")))?;

        let salt = required_field(wire.salt, "salt")?;
        let iv = required_field(wire.iv, "iv")?;
        let ct = required_field(wire.ct, "ct")?;

        let version = match wire.v {
            Some(v) if v == u64::from(ENVELOPE_VERSION) => ENVELOPE_VERSION,
            Some(v) => {
                return Err(DecodeFailure::malformed(format!(
                    "unsupported envelope version {v}"
                )));
            }
            None => return Err(DecodeFailure::malformed("missing field `v`")),
        };

        let salt: [u8; SALT_SIZE] = decode_fixed(&salt, "salt")?;
        let iv: [u8; IV_SIZE] = decode_fixed(&iv, "iv")?;
        let ciphertext = decode_field(&ct, "ct")?;
        if ciphertext.len() < TAG_SIZE {
            return Err(DecodeFailure::malformed(format!(
                "ciphertext shorter than the {TAG_SIZE}-byte tag"
            )));
        }

        Ok(Self {
            version,
            salt: Salt::from_bytes(salt),
            iv: Iv::from_bytes(iv),
            ciphertext,
            timestamp: wire.ts.filter(|ts| !ts.is_empty()),
            sender: wire.sender.filter(|s| !s.is_empty()),
        })
    }
}

fn required_field(value: Option<String>, name: &str) -> Result<String, DecodeFailure> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DecodeFailure::malformed(format!("missing field `{name}`")))
}

fn decode_field(value: &str, name: &str) -> Result<Vec<u8>, DecodeFailure> {
    STANDARD
        .decode(value)
        .map_err(|_| DecodeFailure::malformed(format!("field `{name}` is not valid base64")))
}

fn decode_fixed<const N: usize>(value: &str, name: &str) -> Result<[u8; N], DecodeFailure> {
    let bytes = decode_field(value, name)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        DecodeFailure::malformed(format!("field `{name}` is {len} bytes, expected {N}"))
    })
}

/// Metadata recovered alongside the plaintext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageMeta {
    pub ts: Option<String>,
    pub sender: Option<String>,
    pub version: u32,
}

impl MessageMeta {
    /// Parses `ts`, if present and well-formed.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.ts
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Successful result of opening a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DecryptedMessage {
    pub text: String,
    pub meta: MessageMeta,
}

/// Seals and opens tokens under an agreed PBKDF2 iteration count.
///
/// Holds no keys and no session state; any number of threads may share one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnvelopeCodec {
    params: KdfParams,
}

impl EnvelopeCodec {
    pub fn new(params: KdfParams) -> CryptoResult<Self> {
        if params.iterations == 0 {
            return Err(CryptoError::KeyDerivation(
                "iteration count must be at least 1".to_string(),
            ));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Encrypts `plaintext` into a fresh token.
    ///
    /// An empty `sender` is treated as no sender.
    pub fn seal(
        &self,
        plaintext: &str,
        paraphrase: &str,
        sender: Option<&str>,
    ) -> CryptoResult<String> {
        let salt = Salt::random()?;
        let iv = Iv::random()?;
        let key = derive_key(paraphrase, &salt, &self.params)?;
        let ciphertext = cipher::encrypt(&key, &iv, plaintext.as_bytes())?;

        Envelope {
            version: ENVELOPE_VERSION,
            salt,
            iv,
            ciphertext,
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            sender: sender.filter(|s| !s.is_empty()).map(str::to_owned),
        }
        .to_token()
    }

    /// Decrypts a token. Every failure is a [`DecodeFailure`] value.
    pub fn open(&self, token: &str, paraphrase: &str) -> Result<DecryptedMessage, DecodeFailure> {
        let envelope = Envelope::from_token(token)?;
        self.open_envelope(&envelope, paraphrase)
    }

    /// Decrypts an already-parsed envelope.
    pub fn open_envelope(
        &self,
        envelope: &Envelope,
        paraphrase: &str,
    ) -> Result<DecryptedMessage, DecodeFailure> {
        // Only fails for a zero iteration count, which `new` rejects.
        let key = derive_key(paraphrase, &envelope.salt, &self.params)
            .map_err(|_| DecodeFailure::AuthenticationFailed)?;
        let plaintext = cipher::decrypt(&key, &envelope.iv, &envelope.ciphertext)?;
        let text = String::from_utf8(plaintext)
            .map_err(|_| DecodeFailure::malformed("plaintext is not valid UTF-8"))?;

        Ok(DecryptedMessage {
            text,
            meta: MessageMeta {
                ts: envelope.timestamp.clone(),
                sender: envelope.sender.clone(),
                version: envelope.version,
            },
        })
    }
}

/// Seals with the default iteration count.
pub fn seal(plaintext: &str, paraphrase: &str, sender: Option<&str>) -> CryptoResult<String> {
    EnvelopeCodec::default().seal(plaintext, paraphrase, sender)
}

/// Opens with the default iteration count.
pub fn open(token: &str, paraphrase: &str) -> Result<DecryptedMessage, DecodeFailure> {
    EnvelopeCodec::default().open(token, paraphrase)
}
