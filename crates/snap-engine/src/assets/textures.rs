use image::RgbaImage;
use crate::api::types::TextureId;

/// An RGBA8 texture ready for upload.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl From<&RgbaImage> for Texture {
    fn from(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.as_raw().clone(),
        }
    }
}

/// Textures published by the game, indexed by `TextureId`.
/// The host re-uploads everything when `revision` changes.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: Vec<Texture>,
    revision: u64,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set; texture `i` becomes `TextureId(i)`.
    pub fn publish(&mut self, textures: Vec<Texture>) {
        self.textures = textures;
        self.revision += 1;
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn publish_replaces_and_bumps_revision() {
        let mut store = TextureStore::new();
        let img = RgbaImage::from_pixel(2, 3, Rgba([1, 2, 3, 4]));
        store.publish(vec![Texture::from(&img), Texture::from(&img)]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.revision(), 1);

        let tex = store.get(TextureId(1)).unwrap();
        assert_eq!((tex.width, tex.height), (2, 3));
        assert_eq!(tex.pixels.len(), 2 * 3 * 4);

        store.publish(Vec::new());
        assert!(store.is_empty());
        assert_eq!(store.revision(), 2);
        assert!(store.get(TextureId(0)).is_none());
    }
}
