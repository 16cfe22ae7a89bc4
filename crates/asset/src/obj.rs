//! Minimal OBJ parser for triangulated meshes with positions, texture
//! coordinates and normals on every face corner.
//!
//! Only `v`, `vt`, `vn` and `f a/b/c a/b/c a/b/c` records are understood;
//! anything else is skipped. Faces are expanded corner by corner, so the
//! result is drawn without an index buffer.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::error::{AssetError, AssetResult, Attribute};
use crate::mesh::MeshData;

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> AssetResult<MeshData> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AssetError::io(path, e))?;
    let mesh = parse_obj(BufReader::new(file), path)?;
    log::info!(
        "Loaded OBJ {}: {} triangles",
        path.display(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> AssetResult<MeshData> {
    parse_obj(reader, Path::new("<reader>"))
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> AssetResult<MeshData> {
    parse_obj(io::Cursor::new(contents), Path::new("<string>"))
}

/// Raw pools plus one index stream per attribute, 1-based as in the file.
#[derive(Default)]
struct ObjPools {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    position_indices: Vec<u32>,
    uv_indices: Vec<u32>,
    normal_indices: Vec<u32>,
}

fn parse_obj<R: BufRead>(reader: R, origin: &Path) -> AssetResult<MeshData> {
    let mut pools = ObjPools::default();
    let mut skipped = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AssetError::io(origin, e))?;
        let line_no = line_no + 1;
        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => {
                let x = parse_f32(parts.next(), line_no, "x coordinate")?;
                let y = parse_f32(parts.next(), line_no, "y coordinate")?;
                let z = parse_f32(parts.next(), line_no, "z coordinate")?;
                pools.positions.push([x, y, z]);
            }
            "vt" => {
                let u = parse_f32(parts.next(), line_no, "u coordinate")?;
                let v = parse_f32(parts.next(), line_no, "v coordinate")?;
                // V is flipped for DDS textures, which are stored top-down.
                pools.uvs.push([u, -v]);
            }
            "vn" => {
                let nx = parse_f32(parts.next(), line_no, "nx coordinate")?;
                let ny = parse_f32(parts.next(), line_no, "ny coordinate")?;
                let nz = parse_f32(parts.next(), line_no, "nz coordinate")?;
                pools.normals.push([nx, ny, nz]);
            }
            "f" => {
                let corners: Vec<&str> = parts.collect();
                if corners.len() != 3 {
                    return Err(unsupported_face(line_no, &line));
                }
                for corner in corners {
                    let [v, vt, vn] = parse_face_corner(corner)
                        .ok_or_else(|| unsupported_face(line_no, &line))?;
                    pools.position_indices.push(v);
                    pools.uv_indices.push(vt);
                    pools.normal_indices.push(vn);
                }
            }
            _ => {
                // Comments, groups, materials, smoothing...
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::debug!("OBJ {}: skipped {} unsupported records", origin.display(), skipped);
    }

    expand(pools)
}

/// Resolve every face corner against the raw pools, in face order.
fn expand(pools: ObjPools) -> AssetResult<MeshData> {
    let corners = pools.position_indices.len();
    let mut mesh = MeshData {
        positions: Vec::with_capacity(corners),
        uvs: Vec::with_capacity(corners),
        normals: Vec::with_capacity(corners),
    };

    for corner in 0..corners {
        let p = resolve(&pools.positions, pools.position_indices[corner], Attribute::Position, corner)?;
        let t = resolve(&pools.uvs, pools.uv_indices[corner], Attribute::TexCoord, corner)?;
        let n = resolve(&pools.normals, pools.normal_indices[corner], Attribute::Normal, corner)?;
        mesh.positions.push(p);
        mesh.uvs.push(t);
        mesh.normals.push(n);
    }

    Ok(mesh)
}

fn resolve<T: Copy>(pool: &[T], index: u32, attribute: Attribute, corner: usize) -> AssetResult<T> {
    (index as usize)
        .checked_sub(1)
        .and_then(|i| pool.get(i).copied())
        .ok_or(AssetError::IndexOutOfRange {
            attribute,
            index,
            len: pool.len(),
            corner,
        })
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> AssetResult<f32> {
    let token = value.ok_or_else(|| AssetError::Parse {
        line: line_no,
        message: format!("missing {what}"),
    })?;
    token.parse::<f32>().map_err(|e| AssetError::Parse {
        line: line_no,
        message: format!("invalid {what} '{token}': {e}"),
    })
}

/// `a/b/c` with all three indices present.
fn parse_face_corner(token: &str) -> Option<[u32; 3]> {
    let mut split = token.split('/');
    let mut out = [0u32; 3];
    for slot in &mut out {
        *slot = split.next()?.parse().ok()?;
    }
    split.next().is_none().then_some(out)
}

fn unsupported_face(line_no: usize, line: &str) -> AssetError {
    AssetError::Parse {
        line: line_no,
        message: format!(
            "unsupported face '{}', expected `f v/vt/vn v/vt/vn v/vt/vn` (re-export triangulated with UVs and normals)",
            line.trim()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = r#"
        v 0.0 0.0 0.0
        v 1.0 0.0 0.0
        v 0.0 1.0 0.0
        vt 0.0 0.0
        vt 1.0 0.0
        vt 0.0 1.0
        vn 0.0 0.0 1.0
        vn 0.0 1.0 0.0
        vn 1.0 0.0 0.0
        f 1/1/1 2/2/2 3/3/3
    "#;

    #[test]
    fn parse_simple_triangle() {
        let mesh = load_obj_from_str(TRIANGLE).expect("parse triangle");
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.uvs.len(), 3);
        assert_eq!(mesh.normals.len(), 3);
        assert!(mesh.is_valid());

        assert_eq!(mesh.positions, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(mesh.uvs, vec![[0.0, -0.0], [1.0, -0.0], [0.0, -1.0]]);
        assert_eq!(mesh.normals, vec![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]);
    }

    #[test]
    fn v_coordinate_is_negated() {
        let src = "v 0 0 0\nvt 0.2 0.7\nvn 0 0 1\nf 1/1/1 1/1/1 1/1/1\n";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.uvs[0], [0.2, -0.7]);
    }

    #[test]
    fn shared_corners_are_duplicated() {
        let src = r#"
            v 0 0 0
            v 1 0 0
            v 1 1 0
            v 0 1 0
            vt 0 0
            vn 0 0 1
            f 1/1/1 2/1/1 3/1/1
            f 1/1/1 3/1/1 4/1/1
        "#;
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.len(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.positions[0], mesh.positions[3]);
        assert_eq!(mesh.positions[2], mesh.positions[4]);
        assert_eq!(mesh.positions[5], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn unknown_records_and_comments_are_ignored() {
        let src = "# exported\r\nmtllib cube.mtl\r\no Cube\r\nv 1 2 3\r\nvt 0 1\r\nvn 0 1 0\r\nusemtl Material\r\ns off\r\nf 1/1/1 1/1/1 1/1/1\r\n";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.positions, vec![[1.0, 2.0, 3.0]; 3]);
        assert_eq!(mesh.normals, vec![[0.0, 1.0, 0.0]; 3]);
    }

    #[test]
    fn faces_may_reference_later_records() {
        let src = "f 1/1/1 2/1/1 2/1/1\nv 0 0 0\nv 5 5 5\nvt 0 0\nvn 0 0 1\n";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.positions[1], [5.0, 5.0, 5.0]);
    }

    #[test]
    fn empty_input_gives_empty_mesh() {
        let mesh = load_obj_from_str("# nothing here\n").unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.is_valid());
    }

    #[test]
    fn missing_normal_indices_is_parse_error() {
        let src = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1 2/2 3/3\n";
        match load_obj_from_str(src) {
            Err(AssetError::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn other_face_encodings_are_rejected() {
        for face in [
            "f 1/1/1 2/2/2 3/3/3 4/4/4",
            "f 1//1 2//2 3//3",
            "f 1 2 3",
            "f 1/1/1 2/2/2",
            "f -1/-1/-1 -2/-2/-2 -3/-3/-3",
            "f 1/1/1/1 2/2/2 3/3/3",
        ] {
            let err = load_obj_from_str(face).unwrap_err();
            assert!(matches!(err, AssetError::Parse { line: 1, .. }), "{face}: {err}");
        }
    }

    #[test]
    fn malformed_vertex_is_parse_error() {
        let err = load_obj_from_str("v 1.0 abc 2.0\n").unwrap_err();
        assert!(matches!(err, AssetError::Parse { line: 1, .. }));
        let err = load_obj_from_str("vt 0.5\n").unwrap_err();
        assert!(err.to_string().contains("missing v coordinate"), "{err}");
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 99/1/1 3/1/1\n";
        match load_obj_from_str(src) {
            Err(AssetError::IndexOutOfRange {
                attribute,
                index,
                len,
                corner,
            }) => {
                assert_eq!(attribute, Attribute::Position);
                assert_eq!(index, 99);
                assert_eq!(len, 3);
                assert_eq!(corner, 1);
            }
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn zero_index_is_out_of_range() {
        let src = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 1/0/1 1/1/1\n";
        let err = load_obj_from_str(src).unwrap_err();
        assert!(matches!(
            err,
            AssetError::IndexOutOfRange {
                attribute: Attribute::TexCoord,
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn load_from_path_and_missing_file() {
        let path = std::env::temp_dir().join(format!("asset-obj-test-{}.obj", std::process::id()));
        std::fs::write(&path, TRIANGLE).unwrap();
        let mesh = load_obj_from_path(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        std::fs::remove_file(&path).unwrap();

        let err = load_obj_from_path(&path).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn reader_entry_point() {
        let mesh = load_obj_from_reader(io::Cursor::new(TRIANGLE.as_bytes())).unwrap();
        assert_eq!(mesh.len(), 3);
    }
}
