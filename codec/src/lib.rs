//! # keyfile-codec
//!
//! Conversion traits shared by every layer of the keyfile workspace.
//!
//! Key material moves through a fixed chain of representations:
//!
//! ```text
//! Vec<u8> → Der → ASN1Object → Element → SubjectPublicKeyInfo / OneAsymmetricKey
//! ```
//!
//! Each arrow is a [`decoder::Decoder`] implementation and the reverse arrow is
//! an [`encoder::Encoder`] implementation. Marker traits restrict which pairs of
//! types may be converted, so an invalid hop (for example `Vec<u8>` straight to
//! a key structure) does not compile.
//!
//! ```ignore
//! use keyfile_codec::decoder::Decoder;
//! use keyfile_codec::encoder::Encoder;
//! use keyfile_der::Der;
//!
//! let der: Der = bytes.decode()?;
//! let bytes_again: Vec<u8> = der.encode()?;
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
