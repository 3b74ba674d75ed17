//! JSON Web Key export (RFC 7517, RFC 7518 Section 6.3).
//!
//! ```json
//! {"keys":[{"kty":"RSA","kid":"2c44...","alg":"RS256","n":"2CYE...","e":"AQAB"}]}
//! ```

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::public_key::RsaPublicKey;

/// A single RSA JSON Web Key.
///
/// `kid` is the key's SHA-256 fingerprint, `n` and `e` are the unsigned
/// big-endian modulus and exponent in base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: String,
    pub alg: String,
    pub n: String,
    pub e: String,
}

impl Jwk {
    pub const KEY_TYPE_RSA: &'static str = "RSA";
    pub const ALGORITHM_RS256: &'static str = "RS256";

    pub fn from_public_key(key: &RsaPublicKey) -> Result<Self> {
        Ok(Self {
            kty: Self::KEY_TYPE_RSA.to_string(),
            kid: key.fingerprint()?,
            alg: Self::ALGORITHM_RS256.to_string(),
            n: URL_SAFE_NO_PAD.encode(key.modulus().to_unsigned_bytes_be()),
            e: URL_SAFE_NO_PAD.encode(key.public_exponent().to_unsigned_bytes_be()),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A JWK Set document (`{"keys": [...]}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    pub fn new(keys: Vec<Jwk>) -> Self {
        Self { keys }
    }

    pub fn from_public_keys<'a>(keys: impl IntoIterator<Item = &'a RsaPublicKey>) -> Result<Self> {
        let keys = keys
            .into_iter()
            .map(RsaPublicKey::to_jwk)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { keys })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSA_PUBLIC_DER: &[u8] = include_bytes!("../../testdata/keys/rsa_public.der");

    fn public_key() -> RsaPublicKey {
        RsaPublicKey::from_der(RSA_PUBLIC_DER).unwrap()
    }

    #[test]
    fn test_jwk_from_public_key() {
        let key = public_key();
        let jwk = key.to_jwk().unwrap();

        assert_eq!(jwk.kty, "RSA");
        assert_eq!(jwk.alg, "RS256");
        assert_eq!(jwk.kid, key.fingerprint().unwrap());
        assert_eq!(jwk.e, "AQAB");
        assert!(jwk.n.starts_with("2CYEShKWvv-8WrdRuEw2ULSW"));
        assert!(!jwk.n.contains('='));

        let modulus = URL_SAFE_NO_PAD.decode(&jwk.n).unwrap();
        assert_eq!(modulus.len(), 256);
        assert_eq!(modulus, key.modulus().to_unsigned_bytes_be());
    }

    #[test]
    fn test_jwk_set_json() {
        let key = public_key();
        let set = JwkSet::from_public_keys([&key]).unwrap();
        let json = set.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let jwk = &value["keys"][0];
        assert_eq!(jwk["kty"], "RSA");
        assert_eq!(jwk["alg"], "RS256");
        assert_eq!(jwk["e"], "AQAB");
        assert_eq!(jwk["kid"], key.fingerprint().unwrap());

        let parsed: JwkSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn test_empty_jwk_set() {
        assert_eq!(JwkSet::default().to_json().unwrap(), r#"{"keys":[]}"#);
        assert_eq!(JwkSet::new(vec![]), JwkSet::default());
    }
}
