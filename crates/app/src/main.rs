//! Entry point: load tutorial assets, then fly the camera around them.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use asset::{
    MeshData,
    shader::ShaderSources,
    texture::{CompressedTexture, TextureData},
};
use corelib::{ControlsConfig, Mat4};

fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    // Last occurrence wins.
    args.iter()
        .rev()
        .find_map(|a| a.strip_prefix(name)?.strip_prefix('='))
}

fn parse_flag(args: &[String], name: &str) -> bool {
    // --flag[=on|off], off by default
    for arg in args.iter().rev() {
        if arg == name {
            return true;
        }
        if let Some(val) = arg.strip_prefix(name).and_then(|v| v.strip_prefix('=')) {
            return matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    false
}

fn parse_arg<T>(args: &[String], name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    arg_value(args, name)
        .map(|v| {
            v.parse::<T>()
                .with_context(|| format!("{name} expects a number, got '{v}'"))
        })
        .transpose()
}

/// `--size=WxH`, refined by `--width=`/`--height=`; defaults to 1024x768.
fn parse_size_args(args: &[String]) -> Result<(u32, u32)> {
    let (mut width, mut height) = (1024, 768);
    if let Some(v) = arg_value(args, "--size") {
        let (w, h) = v
            .split_once(['x', 'X'])
            .with_context(|| format!("--size expects WIDTHxHEIGHT, got '{v}'"))?;
        width = w.parse().with_context(|| format!("bad width in --size={v}"))?;
        height = h.parse().with_context(|| format!("bad height in --size={v}"))?;
    }
    if let Some(w) = parse_arg(args, "--width")? {
        width = w;
    }
    if let Some(h) = parse_arg(args, "--height")? {
        height = h;
    }
    Ok((width, height))
}

fn controls_from_args(args: &[String]) -> Result<ControlsConfig> {
    let (width, height) = parse_size_args(args)?;
    let mut cfg = ControlsConfig::default()
        .with_viewport(width, height)
        .with_clamp_pitch(parse_flag(args, "--clamp-pitch"));
    if let Some(fov) = parse_arg::<f32>(args, "--fov")? {
        cfg = cfg.with_fov(fov);
    }
    if let Some(speed) = parse_arg::<f32>(args, "--speed")? {
        cfg = cfg.with_speed(speed);
    }
    if let Some(mouse) = parse_arg::<f32>(args, "--mouse-speed")? {
        cfg = cfg.with_mouse_speed(mouse);
    }
    cfg.validate().context("Invalid camera settings")?;
    Ok(cfg)
}

enum Texture {
    Image(TextureData),
    Dds(CompressedTexture),
}

fn load_texture(path: &Path) -> Result<Texture> {
    let is_dds = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("dds"));
    let tex = if is_dds {
        Texture::Dds(CompressedTexture::load_dds(path)?)
    } else {
        Texture::Image(TextureData::load(path)?)
    };
    Ok(tex)
}

#[derive(Default)]
struct Scene {
    mesh: Option<MeshData>,
    texture: Option<Texture>,
    shaders: Option<ShaderSources>,
}

fn load_scene(args: &[String]) -> Result<Scene> {
    let mut scene = Scene::default();

    if let Some(path) = arg_value(args, "--obj").map(PathBuf::from) {
        let mesh = asset::obj::load_obj_from_path(&path)
            .with_context(|| format!("Failed to load mesh {}", path.display()))?;
        scene.mesh = Some(mesh);
    }

    if let Some(path) = arg_value(args, "--texture").map(PathBuf::from) {
        let tex = load_texture(&path)
            .with_context(|| format!("Failed to load texture {}", path.display()))?;
        scene.texture = Some(tex);
    }

    match (arg_value(args, "--vs"), arg_value(args, "--fs")) {
        (Some(vs), Some(fs)) => {
            scene.shaders = Some(ShaderSources::load(vs, fs).context("Failed to load shaders")?);
        }
        (None, None) => {}
        _ => anyhow::bail!("--vs and --fs must be given together"),
    }

    Ok(scene)
}

fn describe(scene: &Scene) {
    match &scene.mesh {
        Some(mesh) => log::info!(
            "Mesh: {} triangles, {} KiB of vertex data",
            mesh.triangle_count(),
            (mesh.position_bytes().len() + mesh.uv_bytes().len() + mesh.normal_bytes().len()) / 1024
        ),
        None => log::info!("No mesh given (--obj=path)"),
    }
    match &scene.texture {
        Some(Texture::Image(t)) => log::info!("Texture: {}x{} RGBA8", t.width, t.height),
        Some(Texture::Dds(t)) => log::info!(
            "Texture: {}x{} {:?} (GL format {:#x}), {} mips",
            t.width,
            t.height,
            t.format,
            t.format.gl_internal_format(),
            t.mips.len()
        ),
        None => {}
    }
    if let Some(sh) = &scene.shaders {
        log::info!(
            "Shaders: {} + {}",
            sh.vertex.path.display(),
            sh.fragment.path.display()
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let controls = controls_from_args(&args)?;
    log::info!(
        "Starting glwalk. viewport={}x{}, fov={}, clamp_pitch={}",
        controls.viewport_width,
        controls.viewport_height,
        controls.fov_deg,
        controls.clamp_pitch
    );

    let scene = load_scene(&args)?;
    describe(&scene);

    if parse_flag(&args, "--no-window") {
        return Ok(());
    }

    let settings = platform::WindowSettings {
        title: "glwalk".to_owned(),
        controls,
    };
    platform::run_fly_camera(settings, |cam, m| {
        let mvp = m.mvp(Mat4::IDENTITY);
        log::trace!("eye={:?} mvp[12..16]={:?}", cam.position(), &mvp[12..16]);
    })?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn size_defaults_to_classic_viewport() {
        assert_eq!(parse_size_args(&[]).unwrap(), (1024, 768));
        assert_eq!(parse_size_args(&args(&["--size=800x600"])).unwrap(), (800, 600));
        assert_eq!(parse_size_args(&args(&["--size=800X600", "--width=640"])).unwrap(), (640, 600));
    }

    #[test]
    fn malformed_size_is_reported() {
        for bad in ["--size=800", "--size=axb", "--size=800x", "--width=-5", "--height=tall"] {
            assert!(parse_size_args(&args(&[bad])).is_err(), "{bad} should be rejected");
        }
        let err = controls_from_args(&args(&["--height=0"])).unwrap_err();
        assert!(err.to_string().contains("Invalid camera settings"), "{err}");
    }

    #[test]
    fn flags_accept_bare_and_valued_forms() {
        assert!(parse_flag(&args(&["--clamp-pitch"]), "--clamp-pitch"));
        assert!(parse_flag(&args(&["--clamp-pitch=on"]), "--clamp-pitch"));
        assert!(!parse_flag(&args(&["--clamp-pitch=off"]), "--clamp-pitch"));
        assert!(!parse_flag(&args(&["--clamp-pitchy"]), "--clamp-pitch"));
        assert!(!parse_flag(&[], "--no-window"));
    }

    #[test]
    fn values_take_last_occurrence() {
        let a = args(&["--obj=a.obj", "--objx=b", "--obj=c.obj"]);
        assert_eq!(arg_value(&a, "--obj"), Some("c.obj"));
        assert_eq!(arg_value(&a, "--texture"), None);
    }

    #[test]
    fn controls_config_from_args() {
        let cfg = controls_from_args(&args(&["--fov=60", "--speed=5", "--clamp-pitch", "--size=640x480"]))
            .unwrap();
        assert_eq!(cfg.fov_deg, 60.0);
        assert_eq!(cfg.speed, 5.0);
        assert!(cfg.clamp_pitch);
        assert_eq!((cfg.viewport_width, cfg.viewport_height), (640, 480));

        assert!(controls_from_args(&args(&["--fov=wide"])).is_err());
        assert!(controls_from_args(&args(&["--fov=0"])).is_err());
    }

    #[test]
    fn shader_flags_must_pair() {
        let err = load_scene(&args(&["--vs=a.vert"])).err().unwrap();
        assert!(err.to_string().contains("together"));
    }

    #[test]
    fn missing_mesh_surfaces_context() {
        let err = load_scene(&args(&["--obj=/nonexistent/model.obj"])).err().unwrap();
        assert!(err.to_string().contains("Failed to load mesh"));
        assert!(matches!(
            err.downcast_ref::<asset::AssetError>(),
            Some(asset::AssetError::Io { .. })
        ));
    }
}
