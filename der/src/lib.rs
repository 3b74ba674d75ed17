//! # keyfile-der
//!
//! Distinguished Encoding Rules at the TLV (tag, length, value) level.
//!
//! Parsing is strict: only single-octet tags and minimal definite lengths are
//! accepted, so anything this crate parses serializes back to the same bytes.

use keyfile_codec::decoder::{DecodableFrom, Decoder};
use keyfile_codec::encoder::{EncodableTo, Encoder};
use nom::error::ErrorKind;
use nom::number::complete::be_u8;
use nom::{IResult, Parser};

pub mod error;

use error::Error;

pub const TAG_CONSTRUCTED: u8 = 0x20;
pub const TAG_CLASS_MASK: u8 = 0xc0;
pub const TAG_CLASS_CONTEXT_SPECIFIC: u8 = 0x80;
const TAG_NUMBER_MASK: u8 = 0x1f;

// Nesting deeper than this is rejected instead of recursing further.
const MAX_DEPTH: usize = 32;

/// A sequence of top-level TLVs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }

    fn parse(input: &[u8]) -> IResult<&[u8], Der> {
        let mut elements = Vec::new();
        let mut input = input;
        while !input.is_empty() {
            let (rest, tlv) = Tlv::parse(input, 0)?;
            input = rest;
            elements.push(tlv);
        }
        Ok((input, Der { elements }))
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        let (_, der) = Der::parse(self)?;
        Ok(der)
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut out = Vec::new();
        for tlv in &self.elements {
            tlv.write_to(&mut out);
        }
        Ok(out)
    }
}

/// Universal class tags understood by the upper layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrimitiveTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    Sequence,
    Set,
    Unimplemented(u8),
}

impl From<u8> for PrimitiveTag {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::Boolean,
            0x02 => Self::Integer,
            0x03 => Self::BitString,
            0x04 => Self::OctetString,
            0x05 => Self::Null,
            0x06 => Self::ObjectIdentifier,
            0x30 => Self::Sequence,
            0x31 => Self::Set,
            _ => Self::Unimplemented(value),
        }
    }
}

impl From<&PrimitiveTag> for u8 {
    fn from(tag: &PrimitiveTag) -> Self {
        match tag {
            PrimitiveTag::Boolean => 0x01,
            PrimitiveTag::Integer => 0x02,
            PrimitiveTag::BitString => 0x03,
            PrimitiveTag::OctetString => 0x04,
            PrimitiveTag::Null => 0x05,
            PrimitiveTag::ObjectIdentifier => 0x06,
            PrimitiveTag::Sequence => 0x30,
            PrimitiveTag::Set => 0x31,
            PrimitiveTag::Unimplemented(b) => *b,
        }
    }
}

/// An identifier octet.
///
/// `Primitive` carries the raw octet next to its classification so tags of the
/// application and private classes survive a round trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Primitive(PrimitiveTag, u8),
    ContextSpecific { slot: u8, constructed: bool },
}

impl Tag {
    /// Universal tag with its canonical identifier octet.
    pub fn universal(tag: PrimitiveTag) -> Self {
        Tag::Primitive(tag, u8::from(&tag))
    }

    pub fn is_constructed(&self) -> bool {
        u8::from(self) & TAG_CONSTRUCTED == TAG_CONSTRUCTED
    }
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        if value & TAG_CLASS_MASK == TAG_CLASS_CONTEXT_SPECIFIC {
            return Tag::ContextSpecific {
                slot: value & TAG_NUMBER_MASK,
                constructed: value & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            };
        }
        if value & TAG_CLASS_MASK == 0 {
            return Tag::Primitive(PrimitiveTag::from(value), value);
        }
        Tag::Primitive(PrimitiveTag::Unimplemented(value), value)
    }
}

impl From<&Tag> for u8 {
    fn from(tag: &Tag) -> Self {
        match tag {
            Tag::Primitive(_, raw) => *raw,
            Tag::ContextSpecific { slot, constructed } => {
                let constructed = if *constructed { TAG_CONSTRUCTED } else { 0 };
                TAG_CLASS_CONTEXT_SPECIFIC | constructed | (slot & TAG_NUMBER_MASK)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Tlvs(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            value: Value::Tlvs(tlvs),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Content octets of a primitive TLV.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlvs(_) => None,
        }
    }

    /// Children of a constructed TLV.
    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlvs(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    /// Serializes this TLV, children included.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.push(u8::from(&self.tag));
        match &self.value {
            Value::Data(data) => {
                write_length(data.len(), out);
                out.extend_from_slice(data);
            }
            Value::Tlvs(tlvs) => {
                let mut content = Vec::new();
                for tlv in tlvs {
                    tlv.write_to(&mut content);
                }
                write_length(content.len(), out);
                out.extend_from_slice(&content);
            }
        }
    }

    fn parse(input: &[u8], depth: usize) -> IResult<&[u8], Tlv> {
        if depth > MAX_DEPTH {
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                ErrorKind::TooLarge,
            )));
        }
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        let (input, data) = nom::bytes::complete::take(length).parse(input)?;

        if tag.is_constructed() {
            // parse TLV recursively.
            let mut tlvs = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (rest, tlv) = Self::parse(data, depth + 1)?;
                data = rest;
                tlvs.push(tlv);
            }
            return Ok((input, Tlv::new_constructed(tag, tlvs)));
        }

        Ok((input, Tlv::new_primitive(tag, data.to_vec())))
    }
}

fn parse_tag(input: &[u8]) -> IResult<&[u8], Tag> {
    let (rest, n) = be_u8(input)?;
    if n & TAG_NUMBER_MASK == TAG_NUMBER_MASK {
        // high-tag-number form
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::Tag,
        )));
    }
    Ok((rest, Tag::from(n)))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], usize> {
    let (rest, n) = be_u8(input)?;
    if n & 0x80 == 0 {
        // short form: 0-127
        return Ok((rest, n as usize));
    }

    // long form
    // The low 7 bits hold the number of length octets that follow.
    let count = (n & 0x7f) as usize;
    if count == 0 || count > size_of::<usize>() {
        // 0x80 is the indefinite form, which DER forbids.
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::LengthValue,
        )));
    }
    let (rest, octets) = nom::bytes::complete::take(count).parse(rest)?;
    let length = octets
        .iter()
        .fold(0usize, |length, &b| (length << 8) | b as usize);
    if octets.first() == Some(&0) || length < 0x80 {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::Verify,
        )));
    }
    Ok((rest, length))
}

fn write_length(length: usize, out: &mut Vec<u8>) {
    if length < 0x80 {
        out.push(length as u8);
        return;
    }
    let octets = length.to_be_bytes();
    let skip = octets.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (octets.len() - skip) as u8);
    out.extend_from_slice(&octets[skip..]);
}
