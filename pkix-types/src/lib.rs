//! PKIX (Public Key Infrastructure using X.509) common types
//!
//! The two structures every encoded key starts from:
//! - RFC 5280 Section 4.1.1.2: `AlgorithmIdentifier`
//! - RFC 5280 Section 4.1.2.7: `SubjectPublicKeyInfo`

pub mod algorithm;
pub mod error;
pub mod subject_public_key_info;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters};
pub use error::{Error, Result};
pub use subject_public_key_info::SubjectPublicKeyInfo;
