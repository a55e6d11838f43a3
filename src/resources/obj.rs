//! Wavefront OBJ text parsing.
//!
//! The document is read twice. [`find_material_library`] looks only for the first
//! `mtllib` directive so the materials can be loaded before any geometry. [`parse_obj`]
//! then walks every line, collects the `v`/`vt`/`vn` attribute tables and expands each
//! `f` directive into fan triangles of fully assembled [`ModelVertex`] records, bucketed
//! by the material that was active when the face was read.
//!
//! No index buffer is produced: every triangle corner is its own vertex record.

use std::{collections::BTreeMap, path::Path, str::SplitWhitespace};

use crate::{
    data_structures::model::{DEFAULT_MATERIAL, MaterialGroup, ModelVertex},
    error::{LoadError, Result, TokenError},
};

/// Decoded `p`, `p/t`, `p//n` or `p/t/n` face token with 0-based indices.
///
/// `None` means the index was not given (or was not a positive 1-based index) and is
/// distinct from `Some(0)`, the first element of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceVertexRef {
    pub position: Option<usize>,
    pub tex_coord: Option<usize>,
    pub normal: Option<usize>,
}

impl FaceVertexRef {
    pub fn parse(token: &str) -> std::result::Result<Self, TokenError> {
        let mut components = token.split('/');
        let position = parse_index(components.next())?;
        let tex_coord = parse_index(components.next())?;
        let normal = parse_index(components.next())?;
        Ok(Self {
            position,
            tex_coord,
            normal,
        })
    }
}

fn parse_index(component: Option<&str>) -> std::result::Result<Option<usize>, TokenError> {
    match component {
        None | Some("") => Ok(None),
        Some(raw) => {
            let one_based: i64 = raw
                .parse()
                .map_err(|_| TokenError::InvalidIndex(raw.to_string()))?;
            // Zero and relative (negative) indices have no element to refer to here
            Ok(one_based
                .checked_sub(1)
                .and_then(|index| usize::try_from(index).ok()))
        }
    }
}

/// Splits a convex polygon into triangles that all share its first vertex.
///
/// `[v0, v1, v2, v3]` yields `[v0, v1, v2]` then `[v0, v2, v3]`. Fewer than three
/// vertices yield nothing.
pub fn fan_triangulate<T: Copy>(polygon: &[T]) -> impl Iterator<Item = [T; 3]> + '_ {
    let root = polygon.first().copied();
    polygon
        .windows(2)
        .skip(1)
        .filter_map(move |edge| root.map(|v0| [v0, edge[0], edge[1]]))
}

/// The attribute tables accumulated so far while walking a document.
#[derive(Clone, Debug, Default)]
pub struct AttributeTables {
    pub positions: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
}

impl AttributeTables {
    /// Builds the vertex record for one face corner.
    ///
    /// Indices that are absent or past the end of their table fall back to the
    /// defaults on [`ModelVertex`].
    pub fn assemble(&self, corner: &FaceVertexRef) -> ModelVertex {
        ModelVertex {
            position: lookup(&self.positions, corner.position)
                .unwrap_or(ModelVertex::DEFAULT_POSITION),
            normal: lookup(&self.normals, corner.normal).unwrap_or(ModelVertex::DEFAULT_NORMAL),
            tex_coords: lookup(&self.tex_coords, corner.tex_coord)
                .unwrap_or(ModelVertex::DEFAULT_TEX_COORDS),
            color: ModelVertex::COLOR,
        }
    }
}

fn lookup<T: Copy>(table: &[T], index: Option<usize>) -> Option<T> {
    index.and_then(|i| table.get(i).copied())
}

/// Reads up to `N` floats. The first `required` must be present; the rest default to 0.
pub(crate) fn parse_floats<const N: usize>(
    directive: &'static str,
    tokens: &mut SplitWhitespace<'_>,
    required: usize,
) -> std::result::Result<[f32; N], TokenError> {
    let mut values = [0.0; N];
    let mut found = 0;
    for (slot, token) in values.iter_mut().zip(tokens) {
        *slot = token
            .parse()
            .map_err(|_| TokenError::InvalidNumber(token.to_string()))?;
        found += 1;
    }
    if found < required {
        return Err(TokenError::MissingComponent {
            directive,
            expected: required,
            found,
        });
    }
    Ok(values)
}

/// First pass: the argument of the first `mtllib` directive, if any.
pub fn find_material_library(text: &str) -> Option<String> {
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("mtllib") {
            continue;
        }
        let library = tokens.next().map(str::to_string);
        if library.is_none() {
            log::warn!("Ignoring 'mtllib' directive without a file name.");
        }
        return library;
    }
    None
}

/// Second pass state: attribute tables, the active material and the per-material buckets.
#[derive(Debug, Default)]
struct ObjParser {
    tables: AttributeTables,
    active_material: Option<String>,
    buckets: BTreeMap<String, Vec<ModelVertex>>,
}

impl ObjParser {
    fn parse_line(&mut self, line: &str, line_no: usize) -> std::result::Result<(), TokenError> {
        let mut tokens = line.split_whitespace();
        let Some(directive) = tokens.next() else {
            return Ok(());
        };
        match directive {
            "v" => self
                .tables
                .positions
                .push(parse_floats::<3>("v", &mut tokens, 3)?),
            "vt" => self
                .tables
                .tex_coords
                .push(parse_floats::<2>("vt", &mut tokens, 1)?),
            "vn" => self
                .tables
                .normals
                .push(parse_floats::<3>("vn", &mut tokens, 3)?),
            "usemtl" => self.active_material = tokens.next().map(str::to_string),
            "f" => self.parse_face(tokens, line_no)?,
            // Comments, mtllib (handled by the first pass), groups, smoothing, ...
            _ => (),
        }
        Ok(())
    }

    fn parse_face(
        &mut self,
        tokens: SplitWhitespace<'_>,
        line_no: usize,
    ) -> std::result::Result<(), TokenError> {
        let corners = tokens
            .map(FaceVertexRef::parse)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if corners.len() < 3 {
            log::warn!(
                "Skipping face on line {} with only {} vertices.",
                line_no,
                corners.len()
            );
            return Ok(());
        }

        let material = self
            .active_material
            .get_or_insert_with(|| DEFAULT_MATERIAL.to_string());
        let bucket = self.buckets.entry(material.clone()).or_default();
        let vertices: Vec<ModelVertex> = corners
            .iter()
            .map(|corner| self.tables.assemble(corner))
            .collect();
        for triangle in fan_triangulate(&vertices) {
            bucket.extend_from_slice(&triangle);
        }
        Ok(())
    }

    fn finish(self) -> Vec<MaterialGroup> {
        self.buckets
            .into_iter()
            .map(|(name, vertices)| MaterialGroup::new(name, vertices))
            .collect()
    }
}

/// Second pass: expands every face of `text` into per-material triangle lists.
///
/// Any malformed number or index fails the whole document; `path` is only used to
/// label the error.
pub fn parse_obj(text: &str, path: &Path) -> Result<Vec<MaterialGroup>> {
    let mut parser = ObjParser::default();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        parser
            .parse_line(line, line_no)
            .map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                line: line_no,
                source,
            })?;
    }
    Ok(parser.finish())
}
