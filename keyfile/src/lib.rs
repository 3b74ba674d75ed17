//! Load RSA keys from DER encoded files.
//!
//! - [`read_public_key`] reads an X.509 `SubjectPublicKeyInfo`.
//! - [`read_private_key`] reads an unencrypted PKCS#8 `PrivateKeyInfo`.
//!
//! PEM files are not accepted; convert them first, e.g.
//! `openssl pkey -in key.pem -outform DER -out key.der`.
//!
//! ```no_run
//! let public = keyfile::read_public_key("public_key.der")?;
//! let private = keyfile::read_private_key("private_key.der")?;
//! assert_eq!(private.public_key()?.to_der()?, public.to_der()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
mod loader;

pub use error::{Error, ErrorKind, Result};
pub use keyfile_pkcs::{Jwk, JwkSet, KeyAlgorithm, RsaPrivateKey, RsaPublicKey};
pub use loader::{read_private_key, read_public_key};
