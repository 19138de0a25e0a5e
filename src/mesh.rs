//! Triangle meshes and the OBJ mesh source.
//!
//! A [`Mesh`] is a flat triangle list: every three consecutive vertices form
//! one triangle, with no index buffer. OBJ files are read with `tobj` and
//! flattened into that form at load time.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use crate::error::{RenderError, Result};
use crate::math::{Vec2, Vec3};

/// A mesh vertex in model space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// An immutable flat triangle list.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    /// Wraps a flat vertex list.
    ///
    /// Fails with [`RenderError::MalformedMesh`] unless the length is a
    /// multiple of 3.
    pub fn new(vertices: Vec<Vertex>) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(RenderError::MalformedMesh(vertices.len()));
        }
        Ok(Self { vertices })
    }

    /// Load every object in an OBJ file into a single mesh.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let mesh = Self::parse_obj(&mut reader, &path.display().to_string())?;
        info!(
            "Loaded mesh {} ({} triangles)",
            path.display(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    /// Parse OBJ text from any buffered reader.
    ///
    /// Polygons are fan-triangulated. Missing normals or texture coordinates
    /// default to zero. Texture `v` is flipped so `(0, 0)` addresses the
    /// top-left texel. Material libraries are not read.
    ///
    /// # Arguments
    /// * `context` - Name of the source, used in error messages. Faces that
    ///   reference missing attributes also name their object and face index.
    pub fn parse_obj<R: BufRead>(reader: &mut R, context: &str) -> Result<Self> {
        let parse_error = |source| RenderError::Parse {
            context: context.to_string(),
            source,
        };

        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let (models, _materials) =
            tobj::load_obj_buf(reader, &options, |_| Err(tobj::LoadError::OpenFileFailed))
                .map_err(parse_error)?;

        let mut vertices = Vec::new();
        for model in &models {
            let mesh = &model.mesh;
            for (i, &index) in mesh.indices.iter().enumerate() {
                let face_error = |source| RenderError::Parse {
                    context: format!("{context} (object '{}', face {})", model.name, i / 3),
                    source,
                };

                let position = vec3_at(&mesh.positions, index)
                    .ok_or_else(|| face_error(tobj::LoadError::FaceVertexOutOfBounds))?;

                let normal = match mesh.normal_indices.get(i) {
                    Some(&n) => vec3_at(&mesh.normals, n)
                        .ok_or_else(|| face_error(tobj::LoadError::FaceNormalOutOfBounds))?,
                    None => Vec3::ZERO,
                };

                let uv = match mesh.texcoord_indices.get(i) {
                    Some(&t) => {
                        let t = t as usize * 2;
                        match mesh.texcoords.get(t..t + 2) {
                            Some(&[u, v]) => Vec2::new(u, 1.0 - v),
                            _ => return Err(face_error(tobj::LoadError::FaceTexCoordOutOfBounds)),
                        }
                    }
                    None => Vec2::ZERO,
                };

                vertices.push(Vertex::new(position, normal, uv));
            }
        }

        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Iterate over the triangles of the mesh.
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|tri| [&tri[0], &tri[1], &tri[2]])
    }
}

fn vec3_at(data: &[f32], index: u32) -> Option<Vec3> {
    let i = index as usize * 3;
    match data.get(i..i + 3)? {
        &[x, y, z] => Some(Vec3::new(x, y, z)),
        _ => None,
    }
}
