use keyfile_asn1::{Element, Integer};
use keyfile_codec::decoder::{DecodableFrom, Decoder};
use keyfile_codec::encoder::{EncodableTo, Encoder};

use super::error::{Error, Result};

/*
RFC 8017 - PKCS #1: RSA Cryptography Specifications

RSAPrivateKey ::= SEQUENCE {
    version           Version,
    modulus           INTEGER,  -- n
    publicExponent    INTEGER,  -- e
    privateExponent   INTEGER,  -- d
    prime1            INTEGER,  -- p
    prime2            INTEGER,  -- q
    exponent1         INTEGER,  -- d mod (p-1)
    exponent2         INTEGER,  -- d mod (q-1)
    coefficient       INTEGER,  -- (inverse of q) mod p
    otherPrimeInfos   OtherPrimeInfos OPTIONAL
}

Version ::= INTEGER { two-prime(0), multi(1) }
    (CONSTRAINED BY {-- version must be multi if otherPrimeInfos present --})

OtherPrimeInfos ::= SEQUENCE SIZE(1..MAX) OF OtherPrimeInfo
*/

/// PKCS#1 RSAPrivateKey version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    TwoPrime = 0,
    Multi = 1,
}

impl From<Version> for Integer {
    fn from(v: Version) -> Self {
        Integer::from(v as i64)
    }
}

impl TryFrom<i64> for Version {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Version::TwoPrime),
            1 => Ok(Version::Multi),
            _ => Err(Error::InvalidVersion(value)),
        }
    }
}

impl DecodableFrom<Element> for Version {}

impl Decoder<Element, Version> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Version> {
        let Element::Integer(int) = self else {
            return Err(Error::ExpectedInteger { field: "version" });
        };
        let value = i64::try_from(int).map_err(|_| Error::VersionOutOfRange)?;
        Version::try_from(value)
    }
}

fn integer(element: &Element, field: &'static str) -> Result<Integer> {
    match element {
        Element::Integer(int) => Ok(int.clone()),
        _ => Err(Error::ExpectedInteger { field }),
    }
}

fn positive_integer(element: &Element, field: &'static str) -> Result<Integer> {
    let int = integer(element, field)?;
    if int.is_negative() || int.bits() == 0 {
        return Err(Error::NonPositive { field });
    }
    Ok(int)
}

/// PKCS#1 RSA Private Key structure
///
/// A multi-prime key keeps its `otherPrimeInfos` SEQUENCE as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RSAPrivateKey {
    pub version: Version,
    pub modulus: Integer,          // n
    pub public_exponent: Integer,  // e
    pub private_exponent: Integer, // d
    pub prime1: Integer,           // p
    pub prime2: Integer,           // q
    pub exponent1: Integer,        // d mod (p-1)
    pub exponent2: Integer,        // d mod (q-1)
    pub coefficient: Integer,      // (inverse of q) mod p
    pub other_prime_infos: Option<Element>,
}

impl RSAPrivateKey {
    pub fn key_size(&self) -> u32 {
        u32::try_from(self.modulus.bits()).unwrap_or(u32::MAX)
    }

    /// The `RSAPublicKey` made of this key's modulus and public exponent.
    pub fn public_key(&self) -> RSAPublicKey {
        RSAPublicKey {
            modulus: self.modulus.clone(),
            public_exponent: self.public_exponent.clone(),
        }
    }
}

impl DecodableFrom<Element> for RSAPrivateKey {}

impl Decoder<Element, RSAPrivateKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPrivateKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };

        let [version, n, e, d, p, q, dp, dq, qinv, rest @ ..] = elements.as_slice() else {
            return Err(Error::InvalidElementCount {
                expected: "9 or 10",
                actual: elements.len(),
            });
        };

        let version: Version = version.decode()?;
        let other_prime_infos = match (version, rest) {
            (Version::TwoPrime, []) => None,
            (Version::Multi, [infos @ Element::Sequence(_)]) => Some(infos.clone()),
            (_, [] | [_]) => return Err(Error::OtherPrimeInfosMismatch),
            _ => {
                return Err(Error::InvalidElementCount {
                    expected: "9 or 10",
                    actual: elements.len(),
                });
            }
        };

        Ok(RSAPrivateKey {
            version,
            modulus: positive_integer(n, "modulus")?,
            public_exponent: positive_integer(e, "publicExponent")?,
            private_exponent: integer(d, "privateExponent")?,
            prime1: integer(p, "prime1")?,
            prime2: integer(q, "prime2")?,
            exponent1: integer(dp, "exponent1")?,
            exponent2: integer(dq, "exponent2")?,
            coefficient: integer(qinv, "coefficient")?,
            other_prime_infos,
        })
    }
}

impl EncodableTo<RSAPrivateKey> for Element {}

impl Encoder<RSAPrivateKey, Element> for RSAPrivateKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![
            Element::Integer(Integer::from(self.version)),
            Element::Integer(self.modulus.clone()),
            Element::Integer(self.public_exponent.clone()),
            Element::Integer(self.private_exponent.clone()),
            Element::Integer(self.prime1.clone()),
            Element::Integer(self.prime2.clone()),
            Element::Integer(self.exponent1.clone()),
            Element::Integer(self.exponent2.clone()),
            Element::Integer(self.coefficient.clone()),
        ];
        if let Some(infos) = &self.other_prime_infos {
            elements.push(infos.clone());
        }
        Ok(Element::Sequence(elements))
    }
}

/*
RFC 8017 - RSA Public Key

RSAPublicKey ::= SEQUENCE {
    modulus           INTEGER,  -- n
    publicExponent    INTEGER   -- e
}
*/

/// PKCS#1 RSA Public Key structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RSAPublicKey {
    pub modulus: Integer,         // n
    pub public_exponent: Integer, // e
}

impl RSAPublicKey {
    pub fn key_size(&self) -> u32 {
        u32::try_from(self.modulus.bits()).unwrap_or(u32::MAX)
    }
}

impl DecodableFrom<Element> for RSAPublicKey {}

impl Decoder<Element, RSAPublicKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPublicKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };

        let [n, e] = elements.as_slice() else {
            return Err(Error::InvalidElementCount {
                expected: "2",
                actual: elements.len(),
            });
        };

        Ok(RSAPublicKey {
            modulus: positive_integer(n, "modulus")?,
            public_exponent: positive_integer(e, "publicExponent")?,
        })
    }
}

impl EncodableTo<RSAPublicKey> for Element {}

impl Encoder<RSAPublicKey, Element> for RSAPublicKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::Integer(self.modulus.clone()),
            Element::Integer(self.public_exponent.clone()),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfile_asn1::{ASN1Object, OctetString};
    use keyfile_der::Der;
    use rstest::rstest;

    const RSA_PKCS1_PRIVATE_DER: &[u8] =
        include_bytes!("../../../testdata/keys/rsa_pkcs1_private.der");

    fn first_element(bytes: &[u8]) -> Element {
        let der: Der = bytes.to_vec().decode().unwrap();
        let obj: ASN1Object = der.decode().unwrap();
        obj.elements()[0].clone()
    }

    fn int(value: i64) -> Element {
        Element::Integer(Integer::from(value))
    }

    fn small_private_key(version: i64, rest: Vec<Element>) -> Element {
        let mut elements = vec![
            int(version),
            int(3233),
            int(17),
            int(413),
            int(61),
            int(53),
            int(53),
            int(49),
            int(38),
        ];
        elements.extend(rest);
        Element::Sequence(elements)
    }

    #[test]
    fn test_decode_rsa_private_key_fixture() {
        let elem = first_element(RSA_PKCS1_PRIVATE_DER);
        let key: RSAPrivateKey = elem.decode().unwrap();

        assert_eq!(key.version, Version::TwoPrime);
        assert_eq!(key.key_size(), 2048);
        assert_eq!(key.public_exponent.to_u32(), Some(65537));
        assert!(key.other_prime_infos.is_none());

        let encoded: Element = key.encode().unwrap();
        assert_eq!(encoded, elem);
    }

    #[test]
    fn test_private_key_public_key() {
        let key: RSAPrivateKey = small_private_key(0, vec![]).decode().unwrap();
        let public = key.public_key();

        assert_eq!(public.modulus.to_u32(), Some(3233));
        assert_eq!(public.public_exponent.to_u32(), Some(17));
        assert_eq!(public.key_size(), 12);
    }

    #[test]
    fn test_multi_prime_keeps_other_prime_infos() {
        let infos = Element::Sequence(vec![Element::Sequence(vec![int(7), int(5), int(3)])]);
        let elem = small_private_key(1, vec![infos.clone()]);

        let key: RSAPrivateKey = elem.decode().unwrap();
        assert_eq!(key.version, Version::Multi);
        assert_eq!(key.other_prime_infos, Some(infos));

        let encoded: Element = key.encode().unwrap();
        assert_eq!(encoded, elem);
    }

    #[rstest]
    #[case(Element::Null)]
    #[case(Element::Sequence(vec![int(0), int(3233)]))]
    #[case(small_private_key(2, vec![]))]
    #[case(small_private_key(1, vec![]))]
    #[case(small_private_key(0, vec![Element::Sequence(vec![])]))]
    #[case(small_private_key(1, vec![Element::Null]))]
    #[case(small_private_key(1, vec![Element::Sequence(vec![]), Element::Null]))]
    #[case(Element::Sequence(vec![
        int(0), int(3233), int(17), Element::OctetString(OctetString::from(vec![1u8])),
        int(61), int(53), int(53), int(49), int(38),
    ]))]
    fn test_decode_rsa_private_key_invalid(#[case] elem: Element) {
        let result: Result<RSAPrivateKey> = elem.decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_rsa_public_key_roundtrip() {
        let key = RSAPublicKey {
            modulus: Integer::from(3233i64),
            public_exponent: Integer::from(65537i64),
        };

        let encoded: Element = key.encode().unwrap();
        let decoded: RSAPublicKey = encoded.decode().unwrap();
        assert_eq!(decoded, key);
    }

    #[rstest]
    #[case(Element::Sequence(vec![int(3233)]))]
    #[case(Element::Sequence(vec![int(3233), int(17), int(1)]))]
    #[case(Element::Sequence(vec![int(0), int(17)]))]
    #[case(Element::Sequence(vec![int(3233), int(-3)]))]
    #[case(Element::Sequence(vec![int(3233), Element::Null]))]
    #[case(Element::Set(vec![int(3233), int(17)]))]
    fn test_decode_rsa_public_key_invalid(#[case] elem: Element) {
        let result: Result<RSAPublicKey> = elem.decode();
        assert!(result.is_err());
    }
}
