//! Encoder trait, the reverse of [`crate::decoder::Decoder`].

/// Converts `self` (of type `T`) into the less structured representation `E`.
///
/// ```ignore
/// let element: Element = spki.encode()?;
/// let der: Der = ASN1Object::new(vec![element]).encode()?;
/// let bytes: Vec<u8> = der.encode()?;
/// ```
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` cannot be represented as `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that `Self` can be produced by encoding a `T`.
pub trait EncodableTo<T> {}
