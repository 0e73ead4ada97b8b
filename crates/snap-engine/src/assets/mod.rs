pub mod library;
pub mod manifest;
pub mod textures;
