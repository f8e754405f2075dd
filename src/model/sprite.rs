use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::foundation::error::{ExportError, ExportResult};
use crate::model::draw::DrawContext;
use crate::model::texture::Texture;
use crate::model::Renderable;

/// A single textured quad placed in a y-up world.
///
/// The quad is centered on `position`, scaled uniformly, and rotated by
/// `rotation_deg + spin_deg_per_sec * time`. It is the simplest model that exercises the whole
/// export pipeline: bounds, drawing, selection and an animation clock.
#[derive(Debug, Clone)]
pub struct SpriteModel {
    id: String,
    name: String,
    texture: Texture,
    texture_path: PathBuf,
    assets_dir: PathBuf,
    /// World-space center.
    pub position: Point,
    /// Uniform scale.
    pub scale: f64,
    /// Base rotation in degrees (counter-clockwise in world space).
    pub rotation_deg: f64,
    /// Rotation speed in degrees per second.
    pub spin_deg_per_sec: f64,
    /// Animation length in seconds.
    pub duration_secs: f32,
    /// Selected flag mirrored from the host's model list.
    pub selected: bool,
    /// Hidden flag mirrored from the host's model list.
    pub hidden: bool,
    /// Whether the texture bytes are premultiplied.
    pub pma: bool,
    time: f32,
}

impl SpriteModel {
    /// Create a sprite from an already decoded texture.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        texture: Texture,
        texture_path: impl Into<PathBuf>,
    ) -> Self {
        let texture_path = texture_path.into();
        let assets_dir = texture_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            id: id.into(),
            name: name.into(),
            texture,
            texture_path,
            assets_dir,
            position: Point::ORIGIN,
            scale: 1.0,
            rotation_deg: 0.0,
            spin_deg_per_sec: 0.0,
            duration_secs: 0.0,
            selected: false,
            hidden: false,
            pma: false,
            time: 0.0,
        }
    }

    /// Seconds elapsed on the animation clock.
    pub fn time(&self) -> f32 {
        self.time
    }

    fn local_to_world(&self) -> Affine {
        let w = f64::from(self.texture.width());
        let h = f64::from(self.texture.height());
        let angle = self.rotation_deg + self.spin_deg_per_sec * f64::from(self.time);
        // Texture rows run downward; flip them so row 0 ends up at the world top (+y).
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(angle.to_radians())
            * Affine::scale_non_uniform(self.scale, -self.scale)
            * Affine::translate(Vec2::new(-w / 2.0, -h / 2.0))
    }
}

impl Renderable for SpriteModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn bounds(&self) -> Rect {
        let local = Rect::new(
            0.0,
            0.0,
            f64::from(self.texture.width()),
            f64::from(self.texture.height()),
        );
        self.local_to_world().transform_rect_bbox(local)
    }

    fn draw(&self, dc: &mut DrawContext<'_>) {
        dc.draw_texture(&self.texture, self.local_to_world(), 1.0);
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn use_pma(&self) -> bool {
        self.pma
    }

    fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    fn source_path(&self) -> &Path {
        &self.texture_path
    }

    fn update(&mut self, delta_secs: f32) {
        self.time += delta_secs.max(0.0);
        if self.duration_secs > 0.0 && self.time >= self.duration_secs {
            self.time %= self.duration_secs;
        }
    }

    fn animation_duration(&self) -> f32 {
        self.duration_secs.max(0.0)
    }
}

/// One sprite entry in a scene file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpriteSpec {
    /// Display name; defaults to the texture file stem.
    pub name: Option<String>,
    /// Texture path, relative to the scene file.
    pub texture: PathBuf,
    /// World-space center.
    pub position: [f64; 2],
    /// Uniform scale.
    pub scale: f64,
    /// Base rotation in degrees.
    pub rotation_deg: f64,
    /// Rotation speed in degrees per second.
    pub spin_deg_per_sec: f64,
    /// Animation length in seconds.
    pub duration_secs: f32,
    /// Selected flag.
    pub selected: bool,
    /// Hidden flag.
    pub hidden: bool,
    /// Whether the texture is premultiplied.
    pub pma: bool,
}

impl Default for SpriteSpec {
    fn default() -> Self {
        Self {
            name: None,
            texture: PathBuf::new(),
            position: [0.0, 0.0],
            scale: 1.0,
            rotation_deg: 0.0,
            spin_deg_per_sec: 0.0,
            duration_secs: 0.0,
            selected: false,
            hidden: false,
            pma: false,
        }
    }
}

/// A list of sprites, listed top (front) to bottom like a viewer's model list.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SceneFile {
    /// Sprites in list order.
    pub models: Vec<SpriteSpec>,
}

impl SceneFile {
    /// Read a scene description from JSON.
    pub fn from_path(path: &Path) -> ExportResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        serde_json::from_str(&text).map_err(|e| {
            ExportError::serde(format!("invalid scene '{}': {e}", path.display()))
        })
    }

    /// Decode every texture and build the models. Relative paths resolve against `root`.
    pub fn load_models(&self, root: &Path) -> ExportResult<Vec<SpriteModel>> {
        self.models
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let texture_path = root.join(&spec.texture);
                let texture = Texture::load(&texture_path)?;
                let name = spec.name.clone().unwrap_or_else(|| {
                    texture_path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| format!("model{i}"))
                });
                let id = format!("{}#{i}", texture_path.display());

                let mut model = SpriteModel::new(id, name, texture, texture_path);
                model.position = Point::new(spec.position[0], spec.position[1]);
                model.scale = spec.scale;
                model.rotation_deg = spec.rotation_deg;
                model.spin_deg_per_sec = spec.spin_deg_per_sec;
                model.duration_secs = spec.duration_secs;
                model.selected = spec.selected;
                model.hidden = spec.hidden;
                model.pma = spec.pma;
                Ok(model)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/sprite.rs"]
mod tests;
