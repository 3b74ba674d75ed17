//! Error types for ASN.1 parsing and encoding.

use thiserror::Error;

/// Errors that can occur during ASN.1 parsing and encoding operations.
#[derive(Debug, Error)]
pub enum Error {
    // Boolean errors
    #[error("BOOLEAN: invalid encoding")]
    InvalidBoolean,

    // Integer errors
    #[error("INTEGER: no data")]
    IntegerNoData,
    #[error("INTEGER: not minimally encoded")]
    IntegerNotMinimal,
    #[error("INTEGER: value out of range for i64")]
    IntegerOutOfRangeI64,

    // Null errors
    #[error("NULL: unexpected content of {0} bytes")]
    NullWithContent(usize),

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: sub-identifier not minimally encoded")]
    ObjectIdentifierNotMinimal,
    #[error("OBJECT IDENTIFIER: sub-identifier overflows u64")]
    ObjectIdentifierOverflow,
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: invalid first components {0}.{1}")]
    ObjectIdentifierInvalidRoot(u64, u64),
    #[error("OBJECT IDENTIFIER: empty string")]
    ObjectIdentifierEmptyString,
    #[error("OBJECT IDENTIFIER: invalid component '{0}'")]
    ObjectIdentifierInvalidComponent(String),

    // BitString errors
    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),
    #[error("BIT STRING: unused bits {0} declared for empty content")]
    BitStringUnusedBitsWithoutData(u8),

    // Structure errors
    #[error("{0}: expected primitive encoding")]
    ExpectedPrimitive(&'static str),

    // DER errors
    #[error("invalid DER encoding: {0}")]
    FailedToDecodeDer(#[from] keyfile_der::error::Error),
}
