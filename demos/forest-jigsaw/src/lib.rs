use wasm_bindgen::prelude::*;
use snap_engine::*;

pub mod config;
pub mod engine;
pub mod game;
pub mod layout;
pub mod piece;
pub mod scramble;
pub mod slicer;

use game::ForestJigsaw;

snap_web::export_game!(ForestJigsaw, "forest-jigsaw");
