//! PKCS#8: Private-Key Information Syntax Specification
//!
//! This module implements the unencrypted `OneAsymmetricKey` of
//! [RFC 5958](https://datatracker.ietf.org/doc/html/rfc5958), which obsoletes
//! RFC 5208 (PKCS#8 v1.2).

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use keyfile_pkix_types::{AlgorithmIdentifier, AlgorithmParameters};
pub use types::{OneAsymmetricKey, PrivateKeyInfo, Version};
