//! tailview-web - browser frontend for tailview
//!
//! Binds the engine to the page: a DOM [`RenderSurface`], a host backed by
//! `history.replaceState`, `localStorage`, `setTimeout` and the Tinycon
//! favicon badge, and a `wasm-bindgen` API the page script feeds transport
//! events into.
//!
//! [`RenderSurface`]: tailview_app::RenderSurface

pub mod bridge;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::TailView;

/// Native builds compile this crate as a stub so the workspace builds and
/// tests on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct TailView;

#[cfg(not(target_arch = "wasm32"))]
impl TailView {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
