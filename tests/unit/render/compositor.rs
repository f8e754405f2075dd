use std::path::Path;

use super::*;
use crate::foundation::core::{Affine, Insets, Rect, Size, Viewport};
use crate::model::texture::Texture;

struct Block {
    id: &'static str,
    rect: Rect,
    color: Rgba8,
    texture: Option<Texture>,
    pma: bool,
    hidden: bool,
}

impl Block {
    fn new(id: &'static str, rect: Rect, color: Rgba8) -> Self {
        Self {
            id,
            rect,
            color,
            texture: None,
            pma: true,
            hidden: false,
        }
    }

    fn straight(mut self) -> Self {
        self.pma = false;
        self
    }
}

impl Renderable for Block {
    fn id(&self) -> &str {
        self.id
    }
    fn name(&self) -> &str {
        self.id
    }
    fn bounds(&self) -> Rect {
        self.rect
    }
    fn draw(&self, dc: &mut DrawContext<'_>) {
        match &self.texture {
            Some(texture) => dc.draw_texture(texture, Affine::IDENTITY, 1.0),
            None => dc.fill_rect(self.rect, Affine::IDENTITY, self.color),
        }
    }
    fn is_selected(&self) -> bool {
        true
    }
    fn is_hidden(&self) -> bool {
        self.hidden
    }
    fn use_pma(&self) -> bool {
        self.pma
    }
    fn assets_dir(&self) -> &Path {
        Path::new("assets")
    }
    fn source_path(&self) -> &Path {
        Path::new("assets/block")
    }
}

fn config(background: Rgba8) -> ExportConfig {
    ExportConfig {
        resolution: Size::new(10, 10),
        preview_view: Viewport::flipped_from_rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
        background,
        ..ExportConfig::default()
    }
}

fn left_half(color: Rgba8) -> Block {
    Block::new("left", Rect::new(0.0, 0.0, 5.0, 10.0), color)
}

fn within(a: [u8; 4], b: [u8; 4], tolerance: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tolerance)
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    within(a, b, 1)
}

#[test]
fn opaque_background_returns_accumulation_bytes() {
    let cfg = config(Rgba8::new(10, 20, 30, 255));
    let block = left_half(Rgba8::new(200, 100, 50, 255));
    let mut cache = RenderTargetCache::default();
    let mut comp = FrameCompositor::new();

    let accum = comp.compose_premultiplied(&mut cache, &cfg, &[&block]).unwrap();
    let frame = comp.compose(&mut cache, &cfg, &[&block]).unwrap();

    assert_eq!(frame.data, accum.data);
    assert!(!frame.premultiplied);
    assert_eq!(comp.stats().unpremultiply_passes, 0);
    assert_eq!(comp.stats().frames, 1);
}

#[test]
fn transparent_background_keeps_opaque_source_color() {
    let cfg = config(Rgba8::transparent());
    let block = left_half(Rgba8::new(255, 0, 0, 255));
    let mut cache = RenderTargetCache::default();
    let mut comp = FrameCompositor::new();

    let frame = comp.compose(&mut cache, &cfg, &[&block]).unwrap();

    assert_eq!((frame.width, frame.height), (10, 10));
    assert_eq!(frame.pixel(2, 5), [255, 0, 0, 255]);
    assert_eq!(frame.pixel(8, 5), [0, 0, 0, 0]);
    assert_eq!(comp.stats().unpremultiply_passes, 1);
}

#[test]
fn translucent_premultiplied_layer_is_restored_to_straight_alpha() {
    let cfg = config(Rgba8::transparent());
    let block = left_half(Rgba8::new(255, 0, 0, 128));
    let mut cache = RenderTargetCache::default();
    let mut comp = FrameCompositor::new();

    let accum = comp.compose_premultiplied(&mut cache, &cfg, &[&block]).unwrap();
    assert!(close(accum.pixel(2, 5), [128, 0, 0, 128]));

    let frame = comp.compose(&mut cache, &cfg, &[&block]).unwrap();
    assert!(close(frame.pixel(2, 5), [255, 0, 0, 128]));
}

#[test]
fn later_models_draw_on_top() {
    let cfg = config(Rgba8::new(0, 0, 0, 255));
    let red = Block::new("red", Rect::new(0.0, 0.0, 10.0, 10.0), Rgba8::new(255, 0, 0, 255));
    let blue = left_half(Rgba8::new(0, 0, 255, 255));
    let mut cache = RenderTargetCache::default();
    let mut comp = FrameCompositor::new();

    let frame = comp.compose(&mut cache, &cfg, &[&red, &blue]).unwrap();
    assert_eq!(frame.pixel(2, 5), [0, 0, 255, 255]);
    assert_eq!(frame.pixel(8, 5), [255, 0, 0, 255]);
}

#[test]
fn hidden_models_are_not_drawn() {
    let cfg = config(Rgba8::new(1, 2, 3, 255));
    let mut block = left_half(Rgba8::new(255, 0, 0, 255));
    block.hidden = true;
    let mut cache = RenderTargetCache::default();
    let mut comp = FrameCompositor::new();

    let frame = comp.compose(&mut cache, &cfg, &[&block]).unwrap();
    assert!(frame.data.chunks_exact(4).all(|p| p == [1, 2, 3, 255]));
    assert_eq!(comp.stats().layers, 0);
}

#[test]
fn padding_area_keeps_background() {
    let mut cfg = config(Rgba8::new(0, 0, 0, 255));
    cfg.padding = Insets::uniform(2);
    let block = Block::new(
        "huge",
        Rect::new(-1000.0, -1000.0, 1000.0, 1000.0),
        Rgba8::new(0, 255, 0, 255),
    );
    let mut cache = RenderTargetCache::default();
    let mut comp = FrameCompositor::new();

    let frame = comp.compose(&mut cache, &cfg, &[&block]).unwrap();
    assert_eq!(frame.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(frame.pixel(9, 9), [0, 0, 0, 255]);
    assert_eq!(frame.pixel(5, 5), [0, 255, 0, 255]);
}

#[test]
fn surfaces_go_back_to_the_pool() {
    let cfg = config(Rgba8::transparent());
    let block = left_half(Rgba8::new(255, 0, 0, 255));
    let mut cache = RenderTargetCache::default();
    let mut comp = FrameCompositor::new();

    comp.compose(&mut cache, &cfg, &[&block]).unwrap();
    let after_first = cache.stats().surfaces;
    comp.compose(&mut cache, &cfg, &[&block]).unwrap();
    let after_second = cache.stats().surfaces;

    assert_eq!(after_first.retained_surfaces, 2);
    assert_eq!(after_second.alloc_surfaces, after_first.alloc_surfaces);
}

#[test]
fn straight_translucent_fill_is_premultiplied_once() {
    let cfg = config(Rgba8::transparent());
    let block = left_half(Rgba8::new(255, 0, 0, 128)).straight();
    let mut cache = RenderTargetCache::default();
    let mut comp = FrameCompositor::new();

    let accum = comp.compose_premultiplied(&mut cache, &cfg, &[&block]).unwrap();
    assert!(close(accum.pixel(2, 5), [128, 0, 0, 128]));

    let frame = comp.compose(&mut cache, &cfg, &[&block]).unwrap();
    assert!(close(frame.pixel(2, 5), [255, 0, 0, 128]));
}

#[test]
fn straight_antialiased_edge_keeps_its_color() {
    let cfg = config(Rgba8::transparent());
    let block = Block::new(
        "edge",
        Rect::new(0.0, 0.0, 4.5, 10.0),
        Rgba8::new(255, 255, 255, 255),
    )
    .straight();
    let mut cache = RenderTargetCache::default();
    let mut comp = FrameCompositor::new();

    let frame = comp.compose(&mut cache, &cfg, &[&block]).unwrap();
    let edge = frame.pixel(4, 5);
    assert!((100..=156).contains(&edge[3]), "edge alpha {edge:?}");
    assert!(edge[..3].iter().all(|&c| c >= 253), "edge color {edge:?}");
    assert_eq!(frame.pixel(2, 5), [255, 255, 255, 255]);
}

#[test]
fn texture_bytes_follow_the_model_alpha_preference() {
    let cfg = config(Rgba8::transparent());
    let full = Rect::new(0.0, 0.0, 10.0, 10.0);

    let straight_bytes = [255u8, 0, 0, 128].repeat(100);
    let mut straight = Block::new("straight", full, Rgba8::transparent()).straight();
    straight.texture = Some(Texture::from_rgba8(&straight_bytes, 10, 10).unwrap());

    let pma_bytes = [128u8, 0, 0, 128].repeat(100);
    let mut pma = Block::new("pma", full, Rgba8::transparent());
    pma.texture = Some(Texture::from_rgba8(&pma_bytes, 10, 10).unwrap());

    let mut cache = RenderTargetCache::default();
    let mut comp = FrameCompositor::new();

    let a = comp.compose(&mut cache, &cfg, &[&straight]).unwrap();
    let b = comp.compose(&mut cache, &cfg, &[&pma]).unwrap();
    // Image sampling may shift a channel by one before the alpha divide.
    assert!(within(a.pixel(5, 5), [255, 0, 0, 128], 3), "{:?}", a.pixel(5, 5));
    assert!(within(b.pixel(5, 5), [255, 0, 0, 128], 3), "{:?}", b.pixel(5, 5));
}

#[test]
fn clear_drops_the_render_context() {
    let cfg = config(Rgba8::new(0, 0, 0, 255));
    let block = left_half(Rgba8::new(255, 0, 0, 255));
    let mut cache = RenderTargetCache::default();
    let mut comp = FrameCompositor::new();
    assert!(!comp.has_context());

    comp.compose(&mut cache, &cfg, &[&block]).unwrap();
    assert!(comp.has_context());

    comp.clear();
    assert!(!comp.has_context());
    let frame = comp.compose(&mut cache, &cfg, &[&block]).unwrap();
    assert_eq!(frame.pixel(2, 5), [255, 0, 0, 255]);
}
