//! Central asset access
//!
//! [`Assets`] pairs a backend loader with one memoizing cache per asset kind.

use super::cache::AssetCache;
use super::error::AssetError;
use super::handle::AssetHandle;
use super::loader::{AssetLoader, Shader, ShaderSources, Texture};

/// Texture and shader lookup, memoized by name
pub struct Assets {
    loader: Box<dyn AssetLoader>,
    textures: AssetCache<Texture>,
    shaders: AssetCache<Shader>,
}

impl Assets {
    /// Create asset storage backed by `loader`
    #[must_use]
    pub fn new(loader: impl AssetLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            textures: AssetCache::new(),
            shaders: AssetCache::new(),
        }
    }

    /// Texture by name, loaded on first request.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if the texture cannot be loaded.
    pub fn texture(&mut self, name: &str) -> Result<AssetHandle<Texture>, AssetError> {
        let loader = &mut self.loader;
        self.textures
            .get_or_load(name, |name| loader.load_texture(name))
            .inspect_err(|err| log::error!("{err}"))
    }

    /// Shader program by stage names, compiled on first request.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if the program cannot be built.
    pub fn shader(
        &mut self,
        vertex: &str,
        fragment: &str,
        geometry: Option<&str>,
    ) -> Result<AssetHandle<Shader>, AssetError> {
        let mut sources = ShaderSources::new(vertex, fragment);
        if let Some(geometry) = geometry {
            sources = sources.with_geometry(geometry);
        }

        let loader = &mut self.loader;
        self.shaders
            .get_or_load(&sources.key(), |_| loader.compile_shader(&sources))
            .inspect_err(|err| log::error!("{err}"))
    }

    /// Number of cached textures
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of cached shader programs
    #[must_use]
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }
}

impl std::fmt::Debug for Assets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assets")
            .field("textures", &self.textures.len())
            .field("shaders", &self.shaders.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::HeadlessLoader;

    #[test]
    fn test_textures_are_memoized() {
        let mut assets = Assets::new(HeadlessLoader::default());

        let a = assets.texture("blocks/stone.png").unwrap();
        let b = assets.texture("blocks/stone.png").unwrap();
        let c = assets.texture("blocks/dirt.png").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(assets.texture_count(), 2);
    }

    #[test]
    fn test_shaders_are_memoized_by_all_stages() {
        let mut assets = Assets::new(HeadlessLoader::default());

        let a = assets.shader("block.vert", "block.frag", None).unwrap();
        let b = assets.shader("block.vert", "block.frag", None).unwrap();
        let c = assets
            .shader("block.vert", "block.frag", Some("outline.geom"))
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(c.sources.geometry.as_deref(), Some("outline.geom"));
        assert_eq!(assets.shader_count(), 2);
    }

    #[test]
    fn test_missing_texture_reports_not_found() {
        let mut assets = Assets::new(HeadlessLoader::default().with_known(["a.png"]));

        assert!(assets.texture("a.png").is_ok());
        assert_eq!(
            assets.texture("b.png").unwrap_err(),
            AssetError::NotFound("b.png".into())
        );
    }
}
