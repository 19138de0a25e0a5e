//! A renderable model: one mesh plus an optional diffuse texture.

use std::path::Path;

use log::warn;

use crate::error::Result;
use crate::mesh::Mesh;
use crate::texture::{SampleMode, Texture, WrapMode};

/// A mesh and the texture its uvs index into.
///
/// Models without a texture render white.
#[derive(Clone, Debug, Default)]
pub struct Model {
    mesh: Mesh,
    texture: Option<Texture>,
}

impl Model {
    pub fn new(mesh: Mesh, texture: Option<Texture>) -> Self {
        Self { mesh, texture }
    }

    /// Load a model from an OBJ file and an optional texture image.
    ///
    /// A mesh that cannot be read or parsed is an error. A texture that
    /// cannot be loaded is not: the model is returned untextured.
    pub fn load(
        mesh_path: &Path,
        texture_path: Option<&Path>,
        wrap: WrapMode,
        sample: SampleMode,
    ) -> Result<Self> {
        let mesh = Mesh::from_obj(mesh_path)?;

        let texture = texture_path.and_then(|path| {
            let texture = Texture::from_file(path)
                .map(|t| t.with_wrap_mode(wrap).with_sample_mode(sample));
            if texture.is_none() {
                warn!("Rendering {} untextured", mesh_path.display());
            }
            texture
        });

        Ok(Self { mesh, texture })
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    // ============ Texture ============

    /// Set the texture for this model.
    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }

    /// Get the texture for this model.
    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use std::io::Write;

    fn write_temp_obj(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("pineda-{}-{name}.obj", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();
        path
    }

    #[test]
    fn missing_texture_leaves_model_untextured() {
        let obj = write_temp_obj("untextured");
        let model = Model::load(
            &obj,
            Some(Path::new("does/not/exist.png")),
            WrapMode::Repeat,
            SampleMode::Nearest,
        )
        .unwrap();
        std::fs::remove_file(&obj).unwrap();

        assert!(model.texture().is_none());
        assert_eq!(model.mesh().triangle_count(), 1);
    }

    #[test]
    fn missing_mesh_is_fatal() {
        let err = Model::load(
            Path::new("does/not/exist.obj"),
            None,
            WrapMode::Repeat,
            SampleMode::Nearest,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }

    #[test]
    fn set_texture_attaches_texture() {
        let mut model = Model::default();
        assert!(model.texture().is_none());
        model.set_texture(Texture::new(1, 1, 4, vec![0, 0, 0, 255]).unwrap());
        assert_eq!(model.texture().map(Texture::channels), Some(4));
    }
}
