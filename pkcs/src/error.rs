use thiserror::Error;

use crate::private_key::KeyAlgorithm;

#[derive(Debug, Error)]
pub enum Error {
    #[error("DER error: {0}")]
    Der(#[from] keyfile_der::error::Error),

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] keyfile_asn1::error::Error),

    #[error(transparent)]
    PKIXTypes(#[from] keyfile_pkix_types::Error),

    #[error("PKCS#1 error: {0}")]
    Pkcs1(#[from] crate::pkcs1::Error),

    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] crate::pkcs8::Error),

    #[error("empty ASN1Object")]
    EmptyAsn1Object,

    #[error("trailing data: {0} extra top-level elements")]
    TrailingData(usize),

    #[error("unsupported key algorithm {found} ({oid}), expected {expected}")]
    UnsupportedAlgorithm {
        expected: KeyAlgorithm,
        found: KeyAlgorithm,
        oid: String,
    },

    #[error("rsaEncryption parameters must be NULL or absent")]
    InvalidRsaParameters,

    #[error("subject public key has {0} unused bits")]
    UnalignedPublicKey(u8),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
