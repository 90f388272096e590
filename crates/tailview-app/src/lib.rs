//! tailview-app - Application state and orchestration for tailview
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management, the Engine that drives it, the rendering-surface and host
//! abstractions the engine writes through, URL handling and configuration
//! loading.

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod format;
pub mod handler;
pub mod host;
pub mod input_key;
pub mod location;
pub mod message;
pub mod process;
pub mod session;
pub mod state;
pub mod surface;
#[cfg(not(target_arch = "wasm32"))]
pub mod theme_store;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use format::{AnsiFormatter, TextFormatter};
pub use handler::{UpdateAction, UpdateResult};
pub use host::{Host, MemoryHost};
pub use input_key::InputKey;
pub use location::Location;
pub use message::Message;
pub use session::{SessionState, UNREAD_CAP};
pub use state::{AppState, LayoutState};
pub use surface::{LineView, MemorySurface, RenderSurface, SurfaceOp, Target};
#[cfg(not(target_arch = "wasm32"))]
pub use theme_store::FileThemeStore;
