//! Decoder trait for type-safe conversions.
//!
//! A decoder turns a source representation `T` into a more structured
//! destination `D`. The destination opts in through [`DecodableFrom`].
//!
//! ```no_run
//! use keyfile_codec::decoder::{DecodableFrom, Decoder};
//!
//! struct Octets(Vec<u8>);
//! struct Length(usize);
//!
//! impl DecodableFrom<Octets> for Length {}
//!
//! impl Decoder<Octets, Length> for Octets {
//!     type Error = std::convert::Infallible;
//!
//!     fn decode(&self) -> Result<Length, Self::Error> {
//!         Ok(Length(self.0.len()))
//!     }
//! }
//! ```

/// Converts `self` (of type `T`) into `D`.
///
/// When a source type can be decoded into several destinations the caller
/// selects one with a type annotation:
///
/// ```ignore
/// let der: Der = bytes.decode()?;
/// let obj: ASN1Object = der.decode()?;
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` does not hold a valid encoding of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that `Self` can be decoded from `T`.
pub trait DecodableFrom<T> {}
