use std::collections::HashMap;
use image::DynamicImage;

/// Failure to produce a named source image.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("image asset `{0}` not found")]
    NotFound(String),
    #[error("image asset `{name}` could not be decoded")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
}

/// Anything that can hand out source images by name.
pub trait ImageSource {
    fn load_image(&self, name: &str) -> Result<DynamicImage, AssetError>;
}

#[derive(Debug, Clone)]
enum StoredImage {
    Encoded(Vec<u8>),
    Decoded(DynamicImage),
}

/// Named source images registered by the host.
///
/// Encoded bytes are kept as-is and decoded on every `load_image`, so a
/// corrupt upload surfaces as `AssetError::Decode` at the point of use.
/// `revision` bumps on every change so games can retry a failed setup.
#[derive(Debug, Default)]
pub struct ImageLibrary {
    images: HashMap<String, StoredImage>,
    revision: u64,
}

impl ImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded image bytes (PNG/JPEG) under `name`.
    pub fn insert_encoded(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(name.into(), StoredImage::Encoded(bytes));
        self.revision += 1;
    }

    /// Register an already decoded image under `name`.
    pub fn insert_decoded(&mut self, name: impl Into<String>, image: DynamicImage) {
        self.images.insert(name.into(), StoredImage::Decoded(image));
        self.revision += 1;
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.images.remove(name).is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl ImageSource for ImageLibrary {
    fn load_image(&self, name: &str) -> Result<DynamicImage, AssetError> {
        match self.images.get(name) {
            None => Err(AssetError::NotFound(name.to_string())),
            Some(StoredImage::Decoded(image)) => Ok(image.clone()),
            Some(StoredImage::Encoded(bytes)) => {
                image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }
}
