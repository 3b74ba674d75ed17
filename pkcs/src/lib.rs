//! PKCS#1 and PKCS#8 structures for RSA keys.
//!
//! The typed keys ([`RsaPublicKey`], [`RsaPrivateKey`]) sit on top of the
//! generic structures:
//!
//! - [`RsaPublicKey`] wraps an X.509 `SubjectPublicKeyInfo` carrying a PKCS#1
//!   `RSAPublicKey`.
//! - [`RsaPrivateKey`] wraps a PKCS#8 `OneAsymmetricKey` carrying a PKCS#1
//!   `RSAPrivateKey`.
//!
//! Both keep the decoded structure, so `to_der` reproduces the input bytes.

#![forbid(unsafe_code)]

use keyfile_asn1::{ASN1Object, Element};
use keyfile_codec::decoder::Decoder;
use keyfile_codec::encoder::Encoder;
use keyfile_der::Der;

pub mod error;
pub mod jwk;
pub mod pkcs1;
pub mod pkcs8;
pub mod private_key;
pub mod public_key;

pub use error::{Error, Result};
pub use jwk::{Jwk, JwkSet};
pub use private_key::{KeyAlgorithm, RsaPrivateKey};
pub use public_key::RsaPublicKey;

/// Parses `bytes` as DER holding exactly one top-level element.
pub(crate) fn decode_single_element(bytes: &[u8]) -> Result<Element> {
    let der: Der = bytes.to_vec().decode()?;
    let obj: ASN1Object = der.decode()?;
    let mut elements = obj.into_elements();
    match elements.len() {
        0 => Err(Error::EmptyAsn1Object),
        1 => elements.pop().ok_or(Error::EmptyAsn1Object),
        n => Err(Error::TrailingData(n - 1)),
    }
}

pub(crate) fn encode_single_element(element: Element) -> Result<Vec<u8>> {
    let der: Der = ASN1Object::new(vec![element]).encode()?;
    Ok(der.encode()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], "empty ASN1Object")]
    #[case(&[0x05, 0x00, 0x05, 0x00], "trailing data")]
    #[case(&[0x30, 0x05, 0x02], "DER error")]
    fn test_decode_single_element_invalid(#[case] bytes: &[u8], #[case] expected: &str) {
        let err = decode_single_element(bytes).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_single_element_roundtrip() {
        let bytes = [0x30, 0x03, 0x02, 0x01, 0x05];
        let element = decode_single_element(&bytes).unwrap();
        assert_eq!(encode_single_element(element).unwrap(), bytes);
    }
}
