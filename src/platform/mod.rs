//! Platform bindings
//!
//! The simulation core is platform-free. Hosts drive it from here:
//! - `web`: wasm-bindgen wrapper for the browser (LocalStorage high scores)
//! - the native binary in `main.rs` drives `World` directly

#[cfg(target_arch = "wasm32")]
pub mod web;
