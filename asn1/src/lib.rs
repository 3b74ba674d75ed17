//! # keyfile-asn1
//!
//! ASN.1 values decoded from DER TLVs.
//!
//! Only the universal types that appear in key structures get a dedicated
//! [`Element`] variant. Everything else is carried as
//! [`Element::Unimplemented`] and written back verbatim.

use std::{fmt::Display, str::FromStr};

use keyfile_codec::decoder::{DecodableFrom, Decoder};
use keyfile_codec::encoder::{EncodableTo, Encoder};
use keyfile_der::{Der, PrimitiveTag, Tag, Tlv};
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

pub mod error;

use error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object, Self::Error> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Der {}

impl Encoder<ASN1Object, Der> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Der, Self::Error> {
        let tlvs = self.elements.iter().map(Tlv::from).collect();
        Ok(Der::new(tlvs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    /// `[slot]` with constructed content.
    ///
    /// EXPLICIT tagging yields a single element; IMPLICIT tagging of a
    /// SET OF / SEQUENCE OF yields its members directly.
    ContextSpecific { slot: u8, elements: Vec<Element> },
    /// `[slot]` with primitive content (IMPLICIT tagging).
    ///
    /// The content octets are kept raw; the schema decides how to read them.
    ContextSpecificPrimitive { slot: u8, data: OctetString },
    Unimplemented(Tlv),
}

fn primitive_data<'a>(tlv: &'a Tlv, name: &'static str) -> Result<&'a [u8], Error> {
    tlv.data().ok_or(Error::ExpectedPrimitive(name))
}

fn decode_children(tlv: &Tlv) -> Result<Vec<Element>, Error> {
    tlv.tlvs()
        .unwrap_or_default()
        .iter()
        .map(Element::try_from)
        .collect()
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        match tlv.tag() {
            Tag::Primitive(primitive_tag, _) => match primitive_tag {
                PrimitiveTag::Boolean => match primitive_data(tlv, "BOOLEAN")? {
                    [0x00] => Ok(Element::Boolean(false)),
                    [0xff] => Ok(Element::Boolean(true)),
                    _ => Err(Error::InvalidBoolean),
                },
                PrimitiveTag::Integer => {
                    let integer = Integer::try_from(primitive_data(tlv, "INTEGER")?)?;
                    Ok(Element::Integer(integer))
                }
                PrimitiveTag::BitString => {
                    let bit_string = BitString::try_from(primitive_data(tlv, "BIT STRING")?)?;
                    Ok(Element::BitString(bit_string))
                }
                PrimitiveTag::OctetString => {
                    let data = primitive_data(tlv, "OCTET STRING")?;
                    Ok(Element::OctetString(OctetString::from(data)))
                }
                PrimitiveTag::Null => match primitive_data(tlv, "NULL")? {
                    [] => Ok(Element::Null),
                    data => Err(Error::NullWithContent(data.len())),
                },
                PrimitiveTag::ObjectIdentifier => {
                    let data = primitive_data(tlv, "OBJECT IDENTIFIER")?;
                    let oid = ObjectIdentifier::try_from(data)?;
                    Ok(Element::ObjectIdentifier(oid))
                }
                PrimitiveTag::Sequence => Ok(Element::Sequence(decode_children(tlv)?)),
                PrimitiveTag::Set => Ok(Element::Set(decode_children(tlv)?)),
                PrimitiveTag::Unimplemented(_) => Ok(Element::Unimplemented(tlv.clone())),
            },
            Tag::ContextSpecific { slot, constructed } => {
                if *constructed {
                    return Ok(Element::ContextSpecific {
                        slot: *slot,
                        elements: decode_children(tlv)?,
                    });
                }
                let data = primitive_data(tlv, "context-specific")?;
                Ok(Element::ContextSpecificPrimitive {
                    slot: *slot,
                    data: OctetString::from(data),
                })
            }
        }
    }
}

fn primitive_tlv(tag: PrimitiveTag, data: Vec<u8>) -> Tlv {
    Tlv::new_primitive(Tag::universal(tag), data)
}

fn constructed_tlv(tag: Tag, elements: &[Element]) -> Tlv {
    Tlv::new_constructed(tag, elements.iter().map(Tlv::from).collect())
}

impl From<&Element> for Tlv {
    fn from(element: &Element) -> Self {
        match element {
            Element::Boolean(b) => {
                primitive_tlv(PrimitiveTag::Boolean, vec![if *b { 0xff } else { 0x00 }])
            }
            Element::Integer(i) => primitive_tlv(PrimitiveTag::Integer, i.to_signed_bytes_be()),
            Element::BitString(bs) => primitive_tlv(PrimitiveTag::BitString, Vec::from(bs)),
            Element::OctetString(os) => {
                primitive_tlv(PrimitiveTag::OctetString, os.as_bytes().to_vec())
            }
            Element::Null => primitive_tlv(PrimitiveTag::Null, vec![]),
            Element::ObjectIdentifier(oid) => {
                primitive_tlv(PrimitiveTag::ObjectIdentifier, Vec::from(oid))
            }
            Element::Sequence(elements) => {
                constructed_tlv(Tag::universal(PrimitiveTag::Sequence), elements)
            }
            Element::Set(elements) => constructed_tlv(Tag::universal(PrimitiveTag::Set), elements),
            Element::ContextSpecific { slot, elements } => constructed_tlv(
                Tag::ContextSpecific {
                    slot: *slot,
                    constructed: true,
                },
                elements,
            ),
            Element::ContextSpecificPrimitive { slot, data } => Tlv::new_primitive(
                Tag::ContextSpecific {
                    slot: *slot,
                    constructed: false,
                },
                data.as_bytes().to_vec(),
            ),
            Element::Unimplemented(tlv) => tlv.clone(),
        }
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv, Self::Error> {
        Ok(Tlv::from(self))
    }
}

// ASN.1 INTEGER is signed and arbitrarily sized.
// DER requires the shortest two's complement form, which is also what
// `BigInt::to_signed_bytes_be` produces, so decode-then-encode is lossless.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    /// Number of significant bits of the magnitude.
    pub fn bits(&self) -> u64 {
        self.inner.bits()
    }

    pub fn is_negative(&self) -> bool {
        self.inner.sign() == Sign::Minus
    }

    /// Two's complement big-endian octets, as written in DER.
    pub fn to_signed_bytes_be(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }

    /// Big-endian magnitude without a sign octet.
    pub fn to_unsigned_bytes_be(&self) -> Vec<u8> {
        self.inner.magnitude().to_bytes_be()
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl TryFrom<&[u8]> for Integer {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value {
            [] => Err(Error::IntegerNoData),
            // nine leading bits all zero or all one
            [0x00, next, ..] if next & 0x80 == 0 => Err(Error::IntegerNotMinimal),
            [0xff, next, ..] if next & 0x80 == 0x80 => Err(Error::IntegerNotMinimal),
            _ => Ok(Integer {
                inner: BigInt::from_signed_bytes_be(value),
            }),
        }
    }
}

impl TryFrom<&Integer> for i64 {
    type Error = Error;

    fn try_from(value: &Integer) -> Result<Self, Self::Error> {
        value.to_i64().ok_or(Error::IntegerOutOfRangeI64)
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn components(&self) -> &[u64] {
        &self.inner
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut sub_identifiers = Vec::new();
        let mut val = 0u64;
        let mut in_progress = false;
        for &b in value {
            if !in_progress && b == 0x80 {
                // a leading 0x80 octet pads the sub-identifier
                return Err(Error::ObjectIdentifierNotMinimal);
            }
            if val > u64::MAX >> 7 {
                return Err(Error::ObjectIdentifierOverflow);
            }
            val = (val << 7) | (b & 0x7f) as u64;
            in_progress = b & 0x80 == 0x80;
            if !in_progress {
                sub_identifiers.push(val);
                val = 0;
            }
        }
        if in_progress {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // The first sub-identifier packs the first two arcs.
        let first = sub_identifiers[0];
        let (arc0, arc1) = match first {
            0..=39 => (0, first),
            40..=79 => (1, first - 40),
            _ => (2, first - 80),
        };
        let inner = [arc0, arc1]
            .into_iter()
            .chain(sub_identifiers.into_iter().skip(1))
            .collect();
        Ok(ObjectIdentifier { inner })
    }
}

fn push_base128(value: u64, out: &mut Vec<u8>) {
    let mut groups = vec![(value & 0x7f) as u8];
    let mut value = value >> 7;
    while value > 0 {
        groups.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.extend(groups.into_iter().rev());
}

impl From<&ObjectIdentifier> for Vec<u8> {
    fn from(oid: &ObjectIdentifier) -> Self {
        // Components are validated on construction, so the first two arcs fit.
        let mut result = Vec::new();
        push_base128(oid.inner[0] * 40 + oid.inner[1], &mut result);
        for v in &oid.inner[2..] {
            push_base128(*v, &mut result);
        }
        result
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::ObjectIdentifierEmptyString);
        }
        let inner = s
            .split('.')
            .map(|c| {
                c.parse::<u64>()
                    .map_err(|_| Error::ObjectIdentifierInvalidComponent(c.to_string()))
            })
            .collect::<Result<Vec<u64>, _>>()?;
        if inner.len() < 2 {
            return Err(Error::ObjectIdentifierTooFewComponents);
        }
        let (arc0, arc1) = (inner[0], inner[1]);
        let root_ok = match arc0 {
            0 | 1 => arc1 < 40,
            2 => arc1 <= u64::MAX - 80,
            _ => false,
        };
        if !root_ok {
            return Err(Error::ObjectIdentifierInvalidRoot(arc0, arc1));
        }
        Ok(ObjectIdentifier { inner })
    }
}

impl PartialEq<str> for ObjectIdentifier {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value {
            [] => Err(Error::BitStringNoData),
            [unused, ..] if *unused > 7 => Err(Error::BitStringUnusedBitsOutOfRange(*unused)),
            [unused] if *unused != 0 => Err(Error::BitStringUnusedBitsWithoutData(*unused)),
            [unused, data @ ..] => Ok(BitString {
                unused: *unused,
                data: data.to_vec(),
            }),
        }
    }
}

impl From<&BitString> for Vec<u8> {
    fn from(value: &BitString) -> Self {
        let mut result = Vec::with_capacity(value.data.len() + 1);
        result.push(value.unused);
        result.extend_from_slice(&value.data);
        result
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(inner: Vec<u8>) -> Self {
        OctetString { inner }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl TryFrom<&OctetString> for ASN1Object {
    type Error = Error;

    fn try_from(value: &OctetString) -> Result<Self, Self::Error> {
        let der: Der = value.as_bytes().to_vec().decode()?;
        der.decode()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn decode_bytes(bytes: &[u8]) -> Result<ASN1Object, Error> {
        let der: Der = bytes.to_vec().decode()?;
        der.decode()
    }

    fn encode_object(obj: &ASN1Object) -> Vec<u8> {
        let der: Der = obj.encode().unwrap();
        der.encode().unwrap()
    }

    #[rstest(input, expected,
        case(vec![0x00], "0"),
        case(vec![0x01], "1"),
        case(vec![0x7f], "127"),
        case(vec![0x00, 0x80], "128"),
        case(vec![0xff], "-1"),
        case(vec![0x80], "-128"),
        case(vec![0x01, 0x00, 0x01], "65537"),
        case(vec![0x03, 0xd4, 0x15, 0x31, 0x8e, 0x2c, 0x57, 0x1d, 0x29, 0x05, 0xfc, 0x3e, 0x05, 0x27, 0x68, 0x9d, 0x0d, 0x09], "333504890676592408951587385614406537514249"),
    )]
    fn test_integer_from_bytes(input: Vec<u8>, expected: &str) {
        let integer = Integer::try_from(input.as_slice()).unwrap();
        assert_eq!(expected, integer.to_string());
        assert_eq!(input, integer.to_signed_bytes_be());
    }

    #[rstest(input, expected,
        case(vec![], "INTEGER: no data"),
        case(vec![0x00, 0x01], "INTEGER: not minimally encoded"),
        case(vec![0xff, 0x80], "INTEGER: not minimally encoded"),
    )]
    fn test_integer_rejects_non_der(input: Vec<u8>, expected: &str) {
        let err = Integer::try_from(input.as_slice()).unwrap_err();
        assert_eq!(expected, err.to_string());
    }

    #[test]
    fn test_integer_unsigned_bytes() {
        let integer = Integer::try_from([0x00, 0x80, 0x01].as_slice()).unwrap();
        assert_eq!(vec![0x80, 0x01], integer.to_unsigned_bytes_be());
        assert_eq!(16, integer.bits());
        assert!(!integer.is_negative());
    }

    #[rstest(input, expected,
        case(vec![0x2a], "1.2"),
        case(vec![0x2b, 0x06, 0x01, 0x04, 0x01], "1.3.6.1.4.1"),
        case(vec![0x09, 0x92, 0x26, 0x89, 0x93, 0xf2, 0x2c, 0x64, 0x01, 0x01], "0.9.2342.19200300.100.1.1"),
        case(vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01], "1.2.840.113549.1.1.1"),
        case(vec![0x2b, 0x65, 0x70], "1.3.101.112"),
        case(vec![0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01], "1.2.840.10045.2.1"),
        case(vec![0x55, 0x1d, 0x00], "2.5.29.0"),
        case(vec![0x88, 0x37, 0x03], "2.999.3"),
    )]
    fn test_object_identifier_round_trip(input: Vec<u8>, expected: &str) {
        let oid = ObjectIdentifier::try_from(input.as_slice()).unwrap();
        assert_eq!(expected, oid.to_string());
        assert!(oid == expected);

        let parsed = ObjectIdentifier::from_str(expected).unwrap();
        assert_eq!(oid, parsed);
        assert_eq!(input, Vec::<u8>::from(&parsed));
    }

    #[rstest(input,
        case(vec![]),
        case(vec![0x2a, 0x86]),
        case(vec![0x2a, 0x80, 0x01]),
        case(vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f]),
    )]
    fn test_object_identifier_rejects_invalid_bytes(input: Vec<u8>) {
        assert!(ObjectIdentifier::try_from(input.as_slice()).is_err());
    }

    #[rstest(input, case(""), case("1"), case("1.a.3"), case("3.1"), case("1.40"), case("1..2"))]
    fn test_object_identifier_rejects_invalid_strings(input: &str) {
        assert!(ObjectIdentifier::from_str(input).is_err());
    }

    #[rstest(input, expected_unused, expected_data,
        case(vec![0x00], 0, vec![]),
        case(vec![0x00, 0xaa], 0, vec![0xaa]),
        case(vec![0x04, 0xa0], 4, vec![0xa0]),
    )]
    fn test_bitstring_from_bytes(input: Vec<u8>, expected_unused: u8, expected_data: Vec<u8>) {
        let bs = BitString::try_from(input.as_slice()).unwrap();
        assert_eq!(expected_unused, bs.unused_bits());
        assert_eq!(expected_data, bs.as_bytes());
        assert_eq!(input, Vec::<u8>::from(&bs));
    }

    #[rstest(input, case(vec![]), case(vec![0x08, 0x00]), case(vec![0x03]))]
    fn test_bitstring_rejects_invalid(input: Vec<u8>) {
        assert!(BitString::try_from(input.as_slice()).is_err());
    }

    #[test]
    fn test_decode_algorithm_identifier_sequence() {
        let bytes = vec![
            0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01, 0x05,
            0x00,
        ];
        let obj = decode_bytes(&bytes).unwrap();
        let expected = Element::Sequence(vec![
            Element::ObjectIdentifier("1.2.840.113549.1.1.1".parse().unwrap()),
            Element::Null,
        ]);
        assert_eq!(&[expected], obj.elements());
        assert_eq!(bytes, encode_object(&obj));
    }

    #[test]
    fn test_decode_context_specific() {
        // [0] { INTEGER 1, INTEGER 2 }, [1] IMPLICIT BIT STRING
        let bytes = vec![
            0xa0, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02, 0x81, 0x02, 0x00, 0xf0,
        ];
        let obj = decode_bytes(&bytes).unwrap();
        assert_eq!(
            &[
                Element::ContextSpecific {
                    slot: 0,
                    elements: vec![
                        Element::Integer(Integer::from(1i64)),
                        Element::Integer(Integer::from(2i64)),
                    ],
                },
                Element::ContextSpecificPrimitive {
                    slot: 1,
                    data: OctetString::from(vec![0x00, 0xf0]),
                },
            ],
            obj.elements()
        );
        assert_eq!(bytes, encode_object(&obj));
    }

    #[test]
    fn test_unimplemented_kept_verbatim() {
        // SEQUENCE { UTF8String "hi", BOOLEAN TRUE }
        let bytes = vec![0x30, 0x07, 0x0c, 0x02, 0x68, 0x69, 0x01, 0x01, 0xff];
        let obj = decode_bytes(&bytes).unwrap();
        let Element::Sequence(children) = &obj.elements()[0] else {
            panic!("expected Sequence");
        };
        assert!(matches!(children[0], Element::Unimplemented(_)));
        assert_eq!(children[1], Element::Boolean(true));
        assert_eq!(bytes, encode_object(&obj));
    }

    #[rstest(input,
        case(vec![0x01, 0x01, 0x01]),
        case(vec![0x05, 0x01, 0x00]),
        case(vec![0x02, 0x00]),
        case(vec![0x30, 0x03, 0x02, 0x01]),
    )]
    fn test_decode_rejects_malformed(input: Vec<u8>) {
        assert!(decode_bytes(&input).is_err());
    }

    #[test]
    fn test_octet_string_nested_object() {
        let os = OctetString::from(vec![0x30, 0x03, 0x02, 0x01, 0x05]);
        let obj = ASN1Object::try_from(&os).unwrap();
        assert_eq!(
            &[Element::Sequence(vec![Element::Integer(Integer::from(5i64))])],
            obj.elements()
        );
    }
}
