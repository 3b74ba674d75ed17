use keyfile_asn1::{BitString, Element, Integer, OctetString};
use keyfile_codec::decoder::{DecodableFrom, Decoder};
use keyfile_codec::encoder::{EncodableTo, Encoder};
use keyfile_pkix_types::AlgorithmIdentifier;

use super::error::{Error, Result};

/*
RFC 5958 - Asymmetric Key Packages

OneAsymmetricKey ::= SEQUENCE {
    version                   Version,
    privateKeyAlgorithm       PrivateKeyAlgorithmIdentifier,
    privateKey                PrivateKey,
    attributes            [0] Attributes OPTIONAL,
    ...,
    [[2: publicKey        [1] PublicKey OPTIONAL ]],
    ...
}

PrivateKeyInfo ::= OneAsymmetricKey

Version ::= INTEGER { v1(0), v2(1) } (v1, ..., v2)

PrivateKey ::= OCTET STRING

PublicKey ::= BIT STRING

Attributes ::= SET OF Attribute
*/

const ATTRIBUTES_SLOT: u8 = 0;
const PUBLIC_KEY_SLOT: u8 = 1;

/// PKCS#8 OneAsymmetricKey version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// Version 1 (no public key)
    V1 = 0,
    /// Version 2 (with public key)
    V2 = 1,
}

impl TryFrom<i64> for Version {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Version::V1),
            1 => Ok(Version::V2),
            _ => Err(Error::InvalidVersion(value)),
        }
    }
}

impl From<Version> for Integer {
    fn from(v: Version) -> Self {
        Integer::from(v as i64)
    }
}

/// PKCS#8 private key container.
///
/// `attributes` holds the members of the `[0]` SET OF as decoded elements;
/// they are not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneAsymmetricKey {
    pub version: Version,
    pub private_key_algorithm: AlgorithmIdentifier,
    pub private_key: OctetString,
    pub attributes: Option<Vec<Element>>,
    pub public_key: Option<BitString>,
}

/// RFC 5208 name of the same structure.
pub type PrivateKeyInfo = OneAsymmetricKey;

impl OneAsymmetricKey {
    /// A v1 structure with no attributes and no public key.
    pub fn new(private_key_algorithm: AlgorithmIdentifier, private_key: OctetString) -> Self {
        Self {
            version: Version::V1,
            private_key_algorithm,
            private_key,
            attributes: None,
            public_key: None,
        }
    }
}

impl DecodableFrom<Element> for OneAsymmetricKey {}

impl Decoder<Element, OneAsymmetricKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<OneAsymmetricKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };

        let [version, algorithm, private_key, rest @ ..] = elements.as_slice() else {
            return Err(Error::InvalidElementCount {
                expected: "3 to 5",
                actual: elements.len(),
            });
        };
        if rest.len() > 2 {
            return Err(Error::InvalidElementCount {
                expected: "3 to 5",
                actual: elements.len(),
            });
        }

        let Element::Integer(version) = version else {
            return Err(Error::ExpectedVersionInteger);
        };
        let version = i64::try_from(version).map_err(|_| Error::ExpectedVersionInteger)?;
        let version = Version::try_from(version)?;

        let private_key_algorithm: AlgorithmIdentifier = algorithm.decode()?;

        let Element::OctetString(private_key) = private_key else {
            return Err(Error::ExpectedOctetString {
                field: "privateKey",
            });
        };

        let mut attributes = None;
        let mut public_key = None;
        for elm in rest {
            match elm {
                Element::ContextSpecific { slot, elements }
                    if *slot == ATTRIBUTES_SLOT && attributes.is_none() && public_key.is_none() =>
                {
                    attributes = Some(elements.clone());
                }
                Element::ContextSpecificPrimitive { slot, data }
                    if *slot == PUBLIC_KEY_SLOT && public_key.is_none() =>
                {
                    public_key = Some(BitString::try_from(data.as_bytes())?);
                }
                Element::ContextSpecific { .. } | Element::ContextSpecificPrimitive { .. } => {
                    return Err(Error::UnexpectedElement("context-specific field out of order"));
                }
                _ => return Err(Error::UnexpectedElement("not a context-specific field")),
            }
        }

        if public_key.is_some() && version == Version::V1 {
            return Err(Error::PublicKeyRequiresV2);
        }

        Ok(OneAsymmetricKey {
            version,
            private_key_algorithm,
            private_key: private_key.clone(),
            attributes,
            public_key,
        })
    }
}

impl EncodableTo<OneAsymmetricKey> for Element {}

impl Encoder<OneAsymmetricKey, Element> for OneAsymmetricKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![
            Element::Integer(Integer::from(self.version)),
            self.private_key_algorithm.encode()?,
            Element::OctetString(self.private_key.clone()),
        ];
        if let Some(attributes) = &self.attributes {
            elements.push(Element::ContextSpecific {
                slot: ATTRIBUTES_SLOT,
                elements: attributes.clone(),
            });
        }
        if let Some(public_key) = &self.public_key {
            elements.push(Element::ContextSpecificPrimitive {
                slot: PUBLIC_KEY_SLOT,
                data: OctetString::from(Vec::<u8>::from(public_key)),
            });
        }
        Ok(Element::Sequence(elements))
    }
}
