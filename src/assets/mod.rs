//! Asset and resource management
//!
//! Provides handle-based access to backend resources with:
//! - Type-safe, shareable asset handles
//! - Per-name memoization of textures and shader programs
//! - A pluggable loader so the engine runs without a GPU

mod cache;
mod error;
mod handle;
mod loader;
mod storage;

pub use cache::AssetCache;
pub use error::AssetError;
pub use handle::AssetHandle;
pub use loader::{AssetLoader, HeadlessLoader, Shader, ShaderSources, Texture};
pub use storage::Assets;
