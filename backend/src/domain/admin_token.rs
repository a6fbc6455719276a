//! Signed admin authorization tokens.
//!
//! Wire format: `v1.<payload>.<signature>`, where `payload` is the base64url
//! (unpadded) JSON encoding of [`AdminClaims`] and `signature` is the
//! base64url HMAC-SHA256 of the payload segment.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_VERSION: &str = "v1";
const MAX_TOKEN_LEN: usize = 1024;

/// Minimum secret length accepted for signing, in bytes.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;

/// Reasons a token is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token does not have the expected shape.
    #[error("token is malformed")]
    Malformed,
    /// The token was produced by an unknown format version.
    #[error("token version is not supported")]
    UnsupportedVersion,
    /// The signature does not match the payload.
    #[error("token signature mismatch")]
    BadSignature,
    /// The token lifetime has elapsed.
    #[error("token expired")]
    Expired,
    /// The MAC rejected the secret key.
    #[error("token signing key rejected")]
    InvalidKey,
    /// The claims could not be serialised.
    #[error("token claims could not be encoded")]
    Encoding,
}

/// Secret key material used to sign tokens. Wiped on drop.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

/// Raised when secret material is too short.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("token secret too short: need >= {min} bytes, got {length}")]
pub struct TokenSecretTooShort {
    /// Provided length.
    pub length: usize,
    /// Required length.
    pub min: usize,
}

impl TokenSecret {
    /// Wrap key material of at least [`TOKEN_SECRET_MIN_LEN`] bytes.
    pub fn new(bytes: Vec<u8>) -> Result<Self, TokenSecretTooShort> {
        if bytes.len() < TOKEN_SECRET_MIN_LEN {
            return Err(TokenSecretTooShort {
                length: bytes.len(),
                min: TOKEN_SECRET_MIN_LEN,
            });
        }
        Ok(Self(Zeroizing::new(bytes)))
    }

    /// Fresh random secret, valid for the lifetime of the process only.
    pub fn generate() -> Self {
        use rand::RngCore;

        let mut bytes = vec![0_u8; 64];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(Zeroizing::new(bytes))
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.0).map_err(|_| TokenError::InvalidKey)
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecret(..)")
    }
}

/// Claims carried by an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Authenticated admin username.
    pub sub: String,
    /// Issue time, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry time, seconds since the Unix epoch.
    pub exp: i64,
}

impl AdminClaims {
    /// Expiry as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is valid up to and including its expiry second.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

/// Serialise and sign `claims`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use clinic_backend::domain::{AdminClaims, TokenSecret, decode_token, encode_token};
///
/// let secret = TokenSecret::generate();
/// let claims = AdminClaims { sub: "admin".into(), iat: 0, exp: 3600 };
/// let token = encode_token(&claims, &secret).unwrap();
/// let now = Utc.timestamp_opt(10, 0).unwrap();
/// assert_eq!(decode_token(&token, &secret, now).unwrap(), claims);
/// ```
pub fn encode_token(claims: &AdminClaims, secret: &TokenSecret) -> Result<String, TokenError> {
    let payload = serde_json::to_vec(claims).map_err(|_| TokenError::Encoding)?;
    let payload_part = URL_SAFE_NO_PAD.encode(payload);
    let mut mac = secret.mac()?;
    mac.update(payload_part.as_bytes());
    let sig_part = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Ok(format!("{TOKEN_VERSION}.{payload_part}.{sig_part}"))
}

/// Check format, signature, and expiry of `token` at `now`.
pub fn decode_token(
    token: &str,
    secret: &TokenSecret,
    now: DateTime<Utc>,
) -> Result<AdminClaims, TokenError> {
    if token.len() > MAX_TOKEN_LEN {
        return Err(TokenError::Malformed);
    }
    let parts: Vec<&str> = token.split('.').collect();
    let (payload_part, sig_part) = match parts.as_slice() {
        [version, payload, sig] if *version == TOKEN_VERSION => (*payload, *sig),
        [_, _, _] => return Err(TokenError::UnsupportedVersion),
        _ => return Err(TokenError::Malformed),
    };

    let signature = URL_SAFE_NO_PAD
        .decode(sig_part)
        .map_err(|_| TokenError::Malformed)?;
    let mut mac = secret.mac()?;
    mac.update(payload_part.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| TokenError::BadSignature)?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload_part)
        .map_err(|_| TokenError::Malformed)?;
    let claims: AdminClaims =
        serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
    if claims.is_expired_at(now) {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn secret() -> TokenSecret {
        TokenSecret::new(vec![7_u8; 32]).expect("long enough")
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).single().expect("timestamp")
    }

    fn claims() -> AdminClaims {
        AdminClaims {
            sub: "admin".to_owned(),
            iat: 1_000,
            exp: 4_600,
        }
    }

    #[rstest]
    fn accepts_until_expiry_second(secret: TokenSecret) {
        let token = encode_token(&claims(), &secret).expect("token encodes");
        assert!(decode_token(&token, &secret, at(4_600)).is_ok());
        assert_eq!(
            decode_token(&token, &secret, at(4_601)),
            Err(TokenError::Expired)
        );
    }

    #[rstest]
    fn rejects_foreign_secret(secret: TokenSecret) {
        let token = encode_token(&claims(), &TokenSecret::generate()).expect("token encodes");
        assert_eq!(
            decode_token(&token, &secret, at(1_000)),
            Err(TokenError::BadSignature)
        );
    }

    #[rstest]
    fn rejects_tampered_payload(secret: TokenSecret) {
        let token = encode_token(&claims(), &secret).expect("token encodes");
        let forged_claims = AdminClaims {
            exp: 99_999,
            ..claims()
        };
        let forged_payload =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).expect("json"));
        let sig = token.rsplit('.').next().expect("signature segment");
        let forged = format!("v1.{forged_payload}.{sig}");
        assert_eq!(
            decode_token(&forged, &secret, at(1_000)),
            Err(TokenError::BadSignature)
        );
    }

    #[rstest]
    #[case("", TokenError::Malformed)]
    #[case("abc", TokenError::Malformed)]
    #[case("v1.a.b.c", TokenError::Malformed)]
    #[case("v2.abc.def", TokenError::UnsupportedVersion)]
    #[case("v1.abc.***", TokenError::Malformed)]
    fn rejects_bad_shapes(secret: TokenSecret, #[case] token: &str, #[case] expected: TokenError) {
        assert_eq!(decode_token(token, &secret, at(1_000)), Err(expected));
    }

    #[test]
    fn short_secrets_are_rejected() {
        let err = TokenSecret::new(vec![1_u8; 8]).expect_err("too short");
        assert_eq!(err.length, 8);
    }
}
