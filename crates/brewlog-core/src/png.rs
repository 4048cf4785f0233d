//! PNG image payloads attached to coffee beans.
//!
//! The store only ever persists PNG bytes. Callers hand in whatever bitmap
//! they have (a file picked by the user, a decoded image) and it is
//! re-encoded here, before the store is reached.

use std::{fmt, io::Cursor};

use image::{DynamicImage, ImageFormat};

use crate::Result;

/// The 8-byte signature every PNG stream starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Owned, PNG-encoded image bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PngImage(Vec<u8>);

impl PngImage {
  /// Decode `bytes` in any supported bitmap format and re-encode as PNG.
  pub fn encode(bytes: &[u8]) -> Result<Self> {
    let decoded = image::load_from_memory(bytes)?;
    Self::from_image(&decoded)
  }

  /// Like [`PngImage::encode`], but an undecodable or unencodable image is
  /// treated as "no image" rather than a failure.
  pub fn encode_lossy(bytes: &[u8]) -> Option<Self> {
    match Self::encode(bytes) {
      Ok(png) => Some(png),
      Err(e) => {
        tracing::warn!(len = bytes.len(), "discarding image that could not be encoded: {e}");
        None
      }
    }
  }

  /// Encode an already decoded bitmap.
  pub fn from_image(image: &DynamicImage) -> Result<Self> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(Self(buf.into_inner()))
  }

  /// Wrap bytes read back from the store. No re-encoding takes place; the
  /// store only ever wrote PNG.
  pub fn from_stored(bytes: Vec<u8>) -> Self { Self(bytes) }

  /// Whether the payload carries the PNG signature.
  pub fn has_png_signature(&self) -> bool { self.0.starts_with(&PNG_SIGNATURE) }

  /// Decode for display.
  pub fn decode(&self) -> Result<DynamicImage> {
    Ok(image::load_from_memory_with_format(&self.0, ImageFormat::Png)?)
  }

  pub fn as_bytes(&self) -> &[u8] { &self.0 }

  pub fn into_bytes(self) -> Vec<u8> { self.0 }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Debug for PngImage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("PngImage").field(&format_args!("{} bytes", self.0.len())).finish()
  }
}
