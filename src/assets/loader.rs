//! Loader interface to the graphics backend
//!
//! The engine never touches GPU resources itself. A loader turns names into
//! backend objects and the engine only passes the resulting handles around.

use glam::UVec2;
use rustc_hash::FxHashSet;

use super::error::AssetError;

/// A texture known to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Name the texture was requested under
    pub name: String,
    /// Size in pixels
    pub size: UVec2,
    /// Backend object id
    pub id: u32,
}

/// Stage sources identifying one shader program
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
    pub geometry: Option<String>,
}

impl ShaderSources {
    /// Program from vertex and fragment stages
    #[must_use]
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
            geometry: None,
        }
    }

    /// Add a geometry stage
    #[must_use]
    pub fn with_geometry(mut self, geometry: impl Into<String>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    /// Cache key: the stage names joined with `|`
    #[must_use]
    pub fn key(&self) -> String {
        match &self.geometry {
            Some(geometry) => format!("{}|{}|{}", self.vertex, self.fragment, geometry),
            None => format!("{}|{}", self.vertex, self.fragment),
        }
    }
}

/// A linked shader program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    pub sources: ShaderSources,
    /// Backend program id
    pub id: u32,
}

/// Backend that creates textures and shader programs.
pub trait AssetLoader {
    /// Load the texture stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::NotFound`] if no such texture exists.
    fn load_texture(&mut self, name: &str) -> Result<Texture, AssetError>;

    /// Compile and link a shader program.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Compile`] if the program cannot be built.
    fn compile_shader(&mut self, sources: &ShaderSources) -> Result<Shader, AssetError>;
}

/// Loader that fabricates backend objects without a GPU.
///
/// Every texture has the same size. When a set of known names is given, any
/// other name fails with [`AssetError::NotFound`].
#[derive(Debug, Clone)]
pub struct HeadlessLoader {
    texture_size: UVec2,
    known: Option<FxHashSet<String>>,
    next_id: u32,
}

impl HeadlessLoader {
    /// Loader accepting every name
    #[must_use]
    pub fn new(texture_size: UVec2) -> Self {
        Self {
            texture_size,
            known: None,
            next_id: 1,
        }
    }

    /// Only accept the given texture names
    #[must_use]
    pub fn with_known<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Number of backend objects created so far
    #[must_use]
    pub fn created(&self) -> u32 {
        self.next_id - 1
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for HeadlessLoader {
    fn default() -> Self {
        Self::new(UVec2::splat(32))
    }
}

impl AssetLoader for HeadlessLoader {
    fn load_texture(&mut self, name: &str) -> Result<Texture, AssetError> {
        if let Some(known) = &self.known
            && !known.contains(name)
        {
            return Err(AssetError::NotFound(name.to_owned()));
        }

        Ok(Texture {
            name: name.to_owned(),
            size: self.texture_size,
            id: self.allocate(),
        })
    }

    fn compile_shader(&mut self, sources: &ShaderSources) -> Result<Shader, AssetError> {
        if sources.vertex.is_empty() || sources.fragment.is_empty() {
            return Err(AssetError::Compile {
                program: sources.key(),
                message: "missing stage source".into(),
            });
        }

        Ok(Shader {
            sources: sources.clone(),
            id: self.allocate(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_textures() {
        let mut loader = HeadlessLoader::default().with_known(["blocks/stone.png"]);

        let stone = loader.load_texture("blocks/stone.png").unwrap();
        assert_eq!(stone.size, UVec2::splat(32));
        assert_eq!(
            loader.load_texture("blocks/nope.png"),
            Err(AssetError::NotFound("blocks/nope.png".into()))
        );
        assert_eq!(loader.created(), 1);
    }

    #[test]
    fn test_shader_key_includes_geometry() {
        let plain = ShaderSources::new("block.vert", "block.frag");
        let geometry = plain.clone().with_geometry("outline.geom");

        assert_eq!(plain.key(), "block.vert|block.frag");
        assert_ne!(plain.key(), geometry.key());
    }

    #[test]
    fn test_empty_stage_fails_to_compile() {
        let mut loader = HeadlessLoader::default();

        let err = loader
            .compile_shader(&ShaderSources::new("", "block.frag"))
            .unwrap_err();
        assert!(matches!(err, AssetError::Compile { .. }));
    }
}
