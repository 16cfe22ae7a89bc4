//! GLSL source loading. Compiling and linking belong to the render back end.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::error::{AssetError, AssetResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub path: PathBuf,
    pub code: String,
}

impl ShaderSource {
    pub fn load(stage: ShaderStage, path: impl AsRef<Path>) -> AssetResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| AssetError::io(path, e))?;
        let code = read_lines(BufReader::new(file), path)?;
        if code.trim().is_empty() {
            return Err(AssetError::EmptyShader {
                path: path.to_path_buf(),
            });
        }
        log::debug!("Read {:?} shader {} ({} bytes)", stage, path.display(), code.len());
        Ok(Self {
            stage,
            path: path.to_path_buf(),
            code,
        })
    }
}

/// Vertex + fragment pair for one program.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderSources {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
}

impl ShaderSources {
    pub fn load(vertex: impl AsRef<Path>, fragment: impl AsRef<Path>) -> AssetResult<Self> {
        Ok(Self {
            vertex: ShaderSource::load(ShaderStage::Vertex, vertex)?,
            fragment: ShaderSource::load(ShaderStage::Fragment, fragment)?,
        })
    }
}

/// Every line is prefixed with `\n`, so line numbers in driver diagnostics
/// are off by one from the file (line 1 of the file is reported as line 2).
fn read_lines<R: BufRead>(reader: R, path: &Path) -> AssetResult<String> {
    let mut code = String::new();
    for line in reader.lines() {
        let line = line.map_err(|e| AssetError::io(path, e))?;
        code.push('\n');
        code.push_str(&line);
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("asset-shader-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn lines_are_newline_prefixed() {
        let code = read_lines(Cursor::new("#version 330 core\nvoid main() {}\n"), Path::new("x")).unwrap();
        assert_eq!(code, "\n#version 330 core\nvoid main() {}");
    }

    #[test]
    fn loads_vertex_and_fragment_pair() {
        let vs = temp_file("pair.vert", "#version 330 core\nlayout(location = 0) in vec3 pos;\n");
        let fs = temp_file("pair.frag", "#version 330 core\nout vec3 color;\n");
        let pair = ShaderSources::load(&vs, &fs).unwrap();
        assert_eq!(pair.vertex.stage, ShaderStage::Vertex);
        assert_eq!(pair.fragment.stage, ShaderStage::Fragment);
        assert!(pair.fragment.code.contains("out vec3 color;"));
        std::fs::remove_file(vs).unwrap();
        std::fs::remove_file(fs).unwrap();
    }

    #[test]
    fn empty_shader_is_rejected() {
        let path = temp_file("empty.frag", "\n   \n");
        let err = ShaderSource::load(ShaderStage::Fragment, &path).unwrap_err();
        assert!(matches!(err, AssetError::EmptyShader { .. }));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ShaderSources::load("/nonexistent/a.vert", "/nonexistent/a.frag").unwrap_err();
        match err {
            AssetError::Io { path, .. } => assert_eq!(path, PathBuf::from("/nonexistent/a.vert")),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
