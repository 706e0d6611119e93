//! Token encoding, decoding and life extraction.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Separates the obfuscated secret from the embedded life span.
pub const LIFE_SEPARATOR: char = '|';

/// Encoded tokens are wrapped at this width, like MIME base64 bodies.
const LINE_WIDTH: usize = 76;

/// Error type for token handling
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token life must be at least one second")]
    ZeroLife,
    #[error("Token is not valid base64: {0}")]
    InvalidEncoding(String),
    #[error("Token payload is not valid UTF-8")]
    InvalidUtf8,
    #[error("Token has no life field")]
    MissingLife,
    #[error("Invalid token life \"{0}\"")]
    InvalidLife(String),
    #[error("Secret character {0:?} can not be encoded with this key and window")]
    UnencodableSecret(char),
}

pub type Result<T> = std::result::Result<T, TokenError>;

/// Current wall-clock time in whole seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Encode `secret` into a token valid for the current `life`-second bucket.
pub fn encode(secret: &str, key: &str, life: u64) -> Result<String> {
    encode_at(secret, key, life, unix_now())
}

/// Encode `secret` as if the clock read `now`.
pub fn encode_at(secret: &str, key: &str, life: u64, now: u64) -> Result<String> {
    if life == 0 {
        return Err(TokenError::ZeroLife);
    }

    let mask = key_mask(&bucket_key(key, now / life));
    let mut payload = secret
        .chars()
        .map(|c| char::from_u32(c as u32 ^ mask).ok_or(TokenError::UnencodableSecret(c)))
        .collect::<Result<String>>()?;
    payload.push(LIFE_SEPARATOR);
    payload.push_str(&life.to_string());

    let encoded = STANDARD.encode(payload.as_bytes());
    Ok(wrap_lines(&encoded).trim_end().to_string())
}

/// Decode a token with the current wall clock.
///
/// Outside the bucket the token was minted in this returns a wrong
/// secret rather than an error.
pub fn decode(token: &str, key: &str) -> Result<String> {
    decode_at(token, key, unix_now())
}

/// Decode a token as if the clock read `now`.
pub fn decode_at(token: &str, key: &str, now: u64) -> Result<String> {
    let (obfuscated, life) = split_payload(token)?;
    if life == 0 {
        return Err(TokenError::ZeroLife);
    }
    Ok(transform(&obfuscated, &bucket_key(key, now / life)))
}

/// Read the life span embedded in a token without decoding the secret.
pub fn get_life(token: &str) -> Result<u64> {
    split_payload(token).map(|(_, life)| life)
}

/// The bucket is rendered as a float (`472222.0`) so tokens interoperate
/// with publishers that divide a floating-point clock.
fn bucket_key(key: &str, bucket: u64) -> String {
    format!("{}{}.0", key, bucket)
}

fn key_mask(key: &str) -> u32 {
    key.chars()
        .enumerate()
        .fold(0u32, |acc, (i, c)| acc ^ (c as u32 + i as u32))
}

/// XOR every character against the whole key. Self-inverse.
///
/// Lossy: results outside the scalar range become U+FFFD. Decoding in the
/// wrong window yields garbage anyway.
fn transform(text: &str, key: &str) -> String {
    let mask = key_mask(key);

    text.chars()
        .map(|c| char::from_u32(c as u32 ^ mask).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn wrap_lines(encoded: &str) -> String {
    encoded
        .as_bytes()
        .chunks(LINE_WIDTH)
        .map(|chunk| String::from_utf8_lossy(chunk))
        .collect::<Vec<_>>()
        .join("\n")
}

fn split_payload(token: &str) -> Result<(String, u64)> {
    let compact: String = token.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| TokenError::InvalidEncoding(e.to_string()))?;
    let payload = String::from_utf8(bytes).map_err(|_| TokenError::InvalidUtf8)?;

    let (obfuscated, life) = payload
        .rsplit_once(LIFE_SEPARATOR)
        .ok_or(TokenError::MissingLife)?;
    let life = life
        .parse::<u64>()
        .map_err(|_| TokenError::InvalidLife(life.to_string()))?;

    Ok((obfuscated.to_string(), life))
}
