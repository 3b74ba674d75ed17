//! AlgorithmIdentifier type
//!
//! Defined in RFC 5280 Section 4.1.1.2

use keyfile_asn1::{Element, ObjectIdentifier};
use keyfile_codec::decoder::{DecodableFrom, Decoder};
use keyfile_codec::encoder::{EncodableTo, Encoder};

use crate::error::{Error, Result};

/// Parameters field in AlgorithmIdentifier
///
/// Wrapped in Option:
/// - None: field not present (e.g. EdDSA)
/// - Some(AlgorithmParameters::Null): explicit NULL (RSA)
/// - Some(AlgorithmParameters::Elm(Element)): anything else, e.g. an EC curve OID
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmParameters {
    /// Explicit NULL (05 00)
    Null,
    Elm(Element),
}

/// Algorithm Identifier
///
/// ```asn1
/// AlgorithmIdentifier ::= SEQUENCE {
///     algorithm   OBJECT IDENTIFIER,
///     parameters  ANY DEFINED BY algorithm OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    pub parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    /// rsaEncryption (RFC 8017)
    pub const OID_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.1";
    /// id-ecPublicKey (RFC 5480)
    pub const OID_EC_PUBLIC_KEY: &'static str = "1.2.840.10045.2.1";
    /// id-Ed25519 (RFC 8410)
    pub const OID_ED25519: &'static str = "1.3.101.112";
    /// id-Ed448 (RFC 8410)
    pub const OID_ED448: &'static str = "1.3.101.113";

    /// Create a new AlgorithmIdentifier with algorithm OID only
    pub fn new(algorithm: ObjectIdentifier) -> Self {
        Self {
            algorithm,
            parameters: None,
        }
    }

    /// Create a new AlgorithmIdentifier with parameters
    pub fn new_with_params(algorithm: ObjectIdentifier, parameters: AlgorithmParameters) -> Self {
        Self {
            algorithm,
            parameters: Some(parameters),
        }
    }

    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    pub fn parameters(&self) -> Option<&AlgorithmParameters> {
        self.parameters.as_ref()
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        let Element::Sequence(elements) = self else {
            return Err(Error::AlgorithmIdentifierExpectedSequence);
        };

        let (algorithm, parameters) = match elements.as_slice() {
            [algorithm] => (algorithm, None),
            [algorithm, parameters] => (algorithm, Some(parameters)),
            _ => {
                return Err(Error::AlgorithmIdentifierInvalidElementCount(
                    elements.len(),
                ));
            }
        };

        let Element::ObjectIdentifier(algorithm) = algorithm else {
            return Err(Error::AlgorithmIdentifierExpectedOid);
        };

        let parameters = parameters.map(|elm| match elm {
            Element::Null => AlgorithmParameters::Null,
            other => AlgorithmParameters::Elm(other.clone()),
        });

        Ok(AlgorithmIdentifier {
            algorithm: algorithm.clone(),
            parameters,
        })
    }
}

impl EncodableTo<AlgorithmIdentifier> for Element {}

impl Encoder<AlgorithmIdentifier, Element> for AlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![Element::ObjectIdentifier(self.algorithm.clone())];
        if let Some(params) = &self.parameters {
            elements.push(match params {
                AlgorithmParameters::Null => Element::Null,
                AlgorithmParameters::Elm(elm) => elm.clone(),
            });
        }

        Ok(Element::Sequence(elements))
    }
}
