use std::fs;
use std::path::Path;

use keyfile_pkcs::{RsaPrivateKey, RsaPublicKey};

use crate::error::{Error, Result};

/// Reads an RSA public key from a DER encoded X.509 `SubjectPublicKeyInfo`
/// file.
pub fn read_public_key(path: impl AsRef<Path>) -> Result<RsaPublicKey> {
    let path = path.as_ref();
    let bytes = read_file(path)?;
    let key = RsaPublicKey::from_der(&bytes).map_err(|source| format_error(path, source))?;
    tracing::debug!(
        path = %path.display(),
        key_size = key.key_size(),
        "loaded RSA public key"
    );
    Ok(key)
}

/// Reads an RSA private key from a DER encoded, unencrypted PKCS#8 file.
pub fn read_private_key(path: impl AsRef<Path>) -> Result<RsaPrivateKey> {
    let path = path.as_ref();
    let bytes = read_file(path)?;
    let key = RsaPrivateKey::from_der(&bytes).map_err(|source| format_error(path, source))?;
    tracing::debug!(
        path = %path.display(),
        key_size = key.key_size(),
        "loaded RSA private key"
    );
    Ok(key)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|source| {
        tracing::debug!(path = %path.display(), error = %source, "failed to read key file");
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read key file");
    Ok(bytes)
}

fn format_error(path: &Path, source: keyfile_pkcs::Error) -> Error {
    tracing::debug!(path = %path.display(), error = %source, "failed to decode key file");
    Error::Format {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    #[test]
    fn test_read_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.der");

        let err = read_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.path(), path.as_path());
        assert!(err.to_string().contains("missing.der"));
    }

    #[test]
    fn test_format_error_keeps_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x05, 0x00]).unwrap();

        let err = read_public_key(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("invalid key file"));
    }
}
