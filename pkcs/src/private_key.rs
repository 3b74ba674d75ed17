//! RSA private keys stored as PKCS#8.
//!
//! ```no_run
//! use keyfile_pkcs::RsaPrivateKey;
//!
//! let bytes = std::fs::read("private_key.der").unwrap();
//! let key = RsaPrivateKey::from_der(&bytes).unwrap();
//! println!("Key size: {} bits", key.key_size());
//! let public = key.public_key().unwrap();
//! println!("Fingerprint: {}", public.fingerprint().unwrap());
//! ```

use keyfile_asn1::Integer;
use keyfile_codec::decoder::Decoder;
use keyfile_codec::encoder::Encoder;
use keyfile_pkix_types::{AlgorithmIdentifier, AlgorithmParameters};

use crate::error::{Error, Result};
use crate::pkcs1::RSAPrivateKey;
use crate::pkcs8::OneAsymmetricKey;
use crate::public_key::RsaPublicKey;
use crate::{decode_single_element, encode_single_element};

/// Key algorithm type.
///
/// Only [`KeyAlgorithm::Rsa`] is loadable; the others name what was found
/// when a file holds a different kind of key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KeyAlgorithm {
    /// RSA encryption
    Rsa,
    /// Elliptic Curve (ECDSA/ECDH)
    Ec,
    /// Ed25519 (EdDSA)
    Ed25519,
    /// Ed448 (EdDSA)
    Ed448,
    /// Unknown or unsupported algorithm
    Unknown,
}

impl KeyAlgorithm {
    /// Returns the OID string for this algorithm, if known.
    #[must_use]
    pub fn oid(&self) -> Option<&'static str> {
        match self {
            KeyAlgorithm::Rsa => Some(AlgorithmIdentifier::OID_RSA_ENCRYPTION),
            KeyAlgorithm::Ec => Some(AlgorithmIdentifier::OID_EC_PUBLIC_KEY),
            KeyAlgorithm::Ed25519 => Some(AlgorithmIdentifier::OID_ED25519),
            KeyAlgorithm::Ed448 => Some(AlgorithmIdentifier::OID_ED448),
            KeyAlgorithm::Unknown => None,
        }
    }

    /// Returns a human-readable name for this algorithm.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            KeyAlgorithm::Rsa => "RSA",
            KeyAlgorithm::Ec => "EC",
            KeyAlgorithm::Ed25519 => "Ed25519",
            KeyAlgorithm::Ed448 => "Ed448",
            KeyAlgorithm::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&AlgorithmIdentifier> for KeyAlgorithm {
    fn from(algorithm: &AlgorithmIdentifier) -> Self {
        match algorithm.algorithm().to_string().as_str() {
            AlgorithmIdentifier::OID_RSA_ENCRYPTION => KeyAlgorithm::Rsa,
            AlgorithmIdentifier::OID_EC_PUBLIC_KEY => KeyAlgorithm::Ec,
            AlgorithmIdentifier::OID_ED25519 => KeyAlgorithm::Ed25519,
            AlgorithmIdentifier::OID_ED448 => KeyAlgorithm::Ed448,
            _ => KeyAlgorithm::Unknown,
        }
    }
}

/// Accepts rsaEncryption with absent or NULL parameters.
pub(crate) fn ensure_rsa(algorithm: &AlgorithmIdentifier) -> Result<()> {
    let found = KeyAlgorithm::from(algorithm);
    if found != KeyAlgorithm::Rsa {
        return Err(Error::UnsupportedAlgorithm {
            expected: KeyAlgorithm::Rsa,
            found,
            oid: algorithm.algorithm().to_string(),
        });
    }
    match algorithm.parameters() {
        None | Some(AlgorithmParameters::Null) => Ok(()),
        Some(AlgorithmParameters::Elm(_)) => Err(Error::InvalidRsaParameters),
    }
}

/// An RSA private key decoded from a PKCS#8 `PrivateKeyInfo`.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    info: OneAsymmetricKey,
    key: RSAPrivateKey,
}

impl RsaPrivateKey {
    /// Decodes DER bytes holding exactly one PKCS#8 structure.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let element = decode_single_element(bytes)?;
        let info: OneAsymmetricKey = element.decode()?;
        Self::from_pkcs8(info)
    }

    pub fn from_pkcs8(info: OneAsymmetricKey) -> Result<Self> {
        ensure_rsa(&info.private_key_algorithm)?;
        let element = decode_single_element(info.private_key.as_bytes())?;
        let key: RSAPrivateKey = element.decode()?;
        Ok(Self { info, key })
    }

    /// Re-encodes the PKCS#8 structure this key was decoded from.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        encode_single_element(self.info.encode()?)
    }

    pub fn pkcs8(&self) -> &OneAsymmetricKey {
        &self.info
    }

    pub fn rsa_private_key(&self) -> &RSAPrivateKey {
        &self.key
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Rsa
    }

    pub fn key_size(&self) -> u32 {
        self.key.key_size()
    }

    pub fn modulus(&self) -> &Integer {
        &self.key.modulus
    }

    pub fn public_exponent(&self) -> &Integer {
        &self.key.public_exponent
    }

    pub fn private_exponent(&self) -> &Integer {
        &self.key.private_exponent
    }

    /// The matching public key, encoded as an X.509 `SubjectPublicKeyInfo`
    /// with NULL parameters.
    pub fn public_key(&self) -> Result<RsaPublicKey> {
        RsaPublicKey::from_rsa_public_key(self.key.public_key())
    }
}

impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("key_size", &self.key_size())
            .field("public_exponent", &self.key.public_exponent)
            .finish_non_exhaustive()
    }
}
