pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod history;
pub mod moves;
pub mod notation;
pub mod piece;

#[cfg(target_arch = "wasm32")]
mod wasm_api;
