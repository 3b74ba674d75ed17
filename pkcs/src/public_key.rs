//! RSA public keys stored as X.509 `SubjectPublicKeyInfo`.

use keyfile_asn1::{BitString, Integer, ObjectIdentifier};
use keyfile_codec::decoder::Decoder;
use keyfile_codec::encoder::Encoder;
use keyfile_pkix_types::{AlgorithmIdentifier, AlgorithmParameters, SubjectPublicKeyInfo};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::jwk::Jwk;
use crate::pkcs1::RSAPublicKey;
use crate::private_key::{KeyAlgorithm, ensure_rsa};
use crate::{decode_single_element, encode_single_element};

/// An RSA public key decoded from an X.509 `SubjectPublicKeyInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    spki: SubjectPublicKeyInfo,
    key: RSAPublicKey,
}

impl RsaPublicKey {
    /// Decodes DER bytes holding exactly one `SubjectPublicKeyInfo`.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let element = decode_single_element(bytes)?;
        let spki: SubjectPublicKeyInfo = element.decode()?;
        Self::from_spki(spki)
    }

    pub fn from_spki(spki: SubjectPublicKeyInfo) -> Result<Self> {
        ensure_rsa(spki.algorithm())?;

        let bits = spki.subject_public_key();
        if bits.unused_bits() != 0 {
            return Err(Error::UnalignedPublicKey(bits.unused_bits()));
        }
        let element = decode_single_element(bits.as_bytes())?;
        let key: RSAPublicKey = element.decode()?;

        Ok(Self { spki, key })
    }

    /// Wraps a PKCS#1 key in a `SubjectPublicKeyInfo` with NULL parameters.
    pub fn from_rsa_public_key(key: RSAPublicKey) -> Result<Self> {
        let oid: ObjectIdentifier = AlgorithmIdentifier::OID_RSA_ENCRYPTION.parse()?;
        let algorithm = AlgorithmIdentifier::new_with_params(oid, AlgorithmParameters::Null);
        let bits = encode_single_element(key.encode()?)?;
        let spki = SubjectPublicKeyInfo::new(algorithm, BitString::new(0, bits));

        Ok(Self { spki, key })
    }

    /// Re-encodes the `SubjectPublicKeyInfo` this key was decoded from.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        encode_single_element(self.spki.encode()?)
    }

    pub fn spki(&self) -> &SubjectPublicKeyInfo {
        &self.spki
    }

    pub fn rsa_public_key(&self) -> &RSAPublicKey {
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

    /// Lowercase hex SHA-256 of the DER encoded `SubjectPublicKeyInfo`.
    pub fn fingerprint(&self) -> Result<String> {
        let der = self.to_der()?;
        Ok(hex::encode(Sha256::digest(&der)))
    }

    pub fn to_jwk(&self) -> Result<Jwk> {
        Jwk::from_public_key(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const RSA_PUBLIC_DER: &[u8] = include_bytes!("../../testdata/keys/rsa_public.der");
    const RSA_PRIVATE_DER: &[u8] = include_bytes!("../../testdata/keys/rsa_private.der");
    const EC_PUBLIC_DER: &[u8] = include_bytes!("../../testdata/keys/ec_public.der");

    const RSA_PUBLIC_FINGERPRINT: &str =
        "2c445bae938a8a161a7e0c27b813f520206d665a19d673bb8736148ac4ffcfec";

    #[test]
    fn test_rsa_public_key_from_der() {
        let key = RsaPublicKey::from_der(RSA_PUBLIC_DER).unwrap();

        assert_eq!(key.algorithm(), KeyAlgorithm::Rsa);
        assert_eq!(key.key_size(), 2048);
        assert_eq!(key.public_exponent().to_u32(), Some(65537));
        assert_eq!(key.modulus().to_unsigned_bytes_be().len(), 256);
        assert_eq!(
            key.spki().algorithm().parameters(),
            Some(&AlgorithmParameters::Null)
        );
        assert_eq!(key.to_der().unwrap(), RSA_PUBLIC_DER);
    }

    #[test]
    fn test_rsa_public_key_fingerprint() {
        let key = RsaPublicKey::from_der(RSA_PUBLIC_DER).unwrap();
        assert_eq!(key.fingerprint().unwrap(), RSA_PUBLIC_FINGERPRINT);
    }

    #[test]
    fn test_rsa_public_key_from_rsa_public_key() {
        let decoded = RsaPublicKey::from_der(RSA_PUBLIC_DER).unwrap();
        let rebuilt = RsaPublicKey::from_rsa_public_key(decoded.rsa_public_key().clone()).unwrap();

        assert_eq!(rebuilt, decoded);
    }

    #[test]
    fn test_rsa_public_key_absent_parameters() {
        let decoded = RsaPublicKey::from_der(RSA_PUBLIC_DER).unwrap();
        let spki = SubjectPublicKeyInfo::new(
            AlgorithmIdentifier::new(decoded.spki().algorithm().algorithm().clone()),
            decoded.spki().subject_public_key().clone(),
        );

        let key = RsaPublicKey::from_spki(spki).unwrap();
        assert_eq!(key.rsa_public_key(), decoded.rsa_public_key());
        assert_ne!(key.to_der().unwrap(), RSA_PUBLIC_DER);
    }

    #[test]
    fn test_rsa_public_key_unaligned_bits() {
        let decoded = RsaPublicKey::from_der(RSA_PUBLIC_DER).unwrap();
        let spki = SubjectPublicKeyInfo::new(
            decoded.spki().algorithm().clone(),
            BitString::new(1, decoded.spki().subject_public_key().as_bytes().to_vec()),
        );

        let err = RsaPublicKey::from_spki(spki).unwrap_err();
        assert!(matches!(err, Error::UnalignedPublicKey(1)));
    }

    #[test]
    fn test_rsa_public_key_ec_key_is_rejected() {
        let err = RsaPublicKey::from_der(EC_PUBLIC_DER).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedAlgorithm {
                found: KeyAlgorithm::Ec,
                ..
            }
        ));
        assert!(err.to_string().contains("1.2.840.10045.2.1"));
    }

    #[rstest]
    #[case::private_key(RSA_PRIVATE_DER)]
    #[case::empty(&[])]
    #[case::truncated(&RSA_PUBLIC_DER[..RSA_PUBLIC_DER.len() - 1])]
    #[case::pem(b"-----BEGIN PUBLIC KEY-----\nMIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA\n-----END PUBLIC KEY-----\n")]
    fn test_rsa_public_key_from_der_invalid(#[case] bytes: &[u8]) {
        assert!(RsaPublicKey::from_der(bytes).is_err());
    }
}
