use std::path::Path;

use super::*;
use crate::foundation::core::{Insets, Rect};
use crate::model::draw::DrawContext;

struct Boxed {
    id: &'static str,
    rect: Rect,
}

impl Renderable for Boxed {
    fn id(&self) -> &str {
        self.id
    }
    fn name(&self) -> &str {
        self.id
    }
    fn bounds(&self) -> Rect {
        self.rect
    }
    fn draw(&self, _dc: &mut DrawContext<'_>) {}
    fn is_selected(&self) -> bool {
        true
    }
    fn use_pma(&self) -> bool {
        false
    }
    fn assets_dir(&self) -> &Path {
        Path::new("assets")
    }
    fn source_path(&self) -> &Path {
        Path::new("assets/boxed")
    }
}

fn auto_config() -> ExportConfig {
    ExportConfig {
        auto_resolution: true,
        ..ExportConfig::default()
    }
}

#[test]
fn key_joins_ids_in_order() {
    let a = Boxed {
        id: "a",
        rect: Rect::new(0.0, 0.0, 1.0, 1.0),
    };
    let b = Boxed {
        id: "b",
        rect: Rect::new(0.0, 0.0, 1.0, 1.0),
    };
    assert_eq!(RenderTargetCache::key_for(&[&a, &b]), "a|b");
    assert_eq!(RenderTargetCache::key_for(&[&b, &a]), "b|a");
}

#[test]
fn auto_entries_are_order_sensitive() {
    let a = Boxed {
        id: "a",
        rect: Rect::new(0.0, 0.0, 10.0, 10.0),
    };
    let b = Boxed {
        id: "b",
        rect: Rect::new(20.0, 0.0, 30.0, 10.0),
    };
    let mut cache = RenderTargetCache::default();
    let cfg = auto_config();

    let ab = cache.target_for(&cfg, &[&a, &b]).unwrap();
    let ba = cache.target_for(&cfg, &[&b, &a]).unwrap();

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().targets_created, 2);
    assert_eq!(ab, ba);
}

#[test]
fn auto_entry_is_reused_for_same_key() {
    let a = Boxed {
        id: "a",
        rect: Rect::new(0.0, 0.0, 10.0, 10.0),
    };
    let mut cache = RenderTargetCache::default();
    let cfg = auto_config();
    cache.target_for(&cfg, &[&a]).unwrap();
    cache.target_for(&cfg, &[&a]).unwrap();
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().targets_created, 1);
}

#[test]
fn auto_resolution_rounds_union_up_and_adds_margin() {
    let a = Boxed {
        id: "a",
        rect: Rect::new(0.0, 0.0, 10.2, 5.0),
    };
    let b = Boxed {
        id: "b",
        rect: Rect::new(20.0, 0.0, 30.0, 7.0),
    };
    let mut cache = RenderTargetCache::default();
    let cfg = ExportConfig {
        margin: Insets::uniform(1),
        ..auto_config()
    };
    let t = cache.target_for(&cfg, &[&a, &b]).unwrap();
    assert_eq!((t.width, t.height), (32, 9));
    assert!(t.viewport.size.y < 0.0);
    assert!((t.viewport.center.x - 15.0).abs() < 1e-9);
}

#[test]
fn auto_resolution_of_empty_bounds_falls_back_to_minimum() {
    let a = Boxed {
        id: "a",
        rect: Rect::new(3.0, 3.0, 3.0, 3.0),
    };
    let mut cache = RenderTargetCache::default();
    let t = cache.target_for(&auto_config(), &[&a]).unwrap();
    assert_eq!((t.width, t.height), (100, 100));
}

#[test]
fn auto_mode_needs_models() {
    let mut cache = RenderTargetCache::default();
    assert!(cache.target_for(&auto_config(), &[]).is_err());
    assert!(cache.is_empty());
}

#[test]
fn fixed_slot_is_created_once_and_ignores_model_set() {
    let a = Boxed {
        id: "a",
        rect: Rect::new(0.0, 0.0, 10.0, 10.0),
    };
    let cfg = ExportConfig {
        resolution: Size::new(64, 32),
        margin: Insets::uniform(2),
        ..ExportConfig::default()
    };
    let mut cache = RenderTargetCache::default();
    let first = cache.target_for(&cfg, &[&a]).unwrap();
    let second = cache.target_for(&cfg, &[]).unwrap();
    assert_eq!(first, second);
    assert_eq!((first.width, first.height), (68, 36));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().targets_created, 1);
}

#[test]
fn fixed_slot_uses_overflow_or_constrained_view() {
    let cfg = ExportConfig {
        resolution: Size::new(50, 50),
        padding: Insets::uniform(5),
        preview_view: Viewport::flipped_from_rect(Rect::new(0.0, 0.0, 50.0, 50.0)),
        ..ExportConfig::default()
    };

    let mut cache = RenderTargetCache::default();
    let constrained = cache.target_for(&cfg, &[]).unwrap();
    assert_eq!(
        constrained.viewport,
        constrained_view(&cfg.preview_view, cfg.resolution, cfg.margin, cfg.padding)
    );

    let overflow_cfg = ExportConfig {
        allow_content_overflow: true,
        ..cfg.clone()
    };
    let mut cache = RenderTargetCache::default();
    let overflow = cache.target_for(&overflow_cfg, &[]).unwrap();
    assert_eq!(
        overflow.viewport,
        overflow_view(&cfg.preview_view, cfg.resolution, cfg.margin, cfg.padding)
    );
}

#[test]
fn clear_releases_everything() {
    let a = Boxed {
        id: "a",
        rect: Rect::new(0.0, 0.0, 10.0, 10.0),
    };
    let mut cache = RenderTargetCache::default();
    cache.target_for(&auto_config(), &[&a]).unwrap();
    cache.target_for(&ExportConfig::default(), &[&a]).unwrap();
    let surface = cache.borrow_surface(10, 10).unwrap();
    cache.release_surface(surface);

    cache.clear();
    let stats = cache.stats();
    assert!(cache.is_empty());
    assert_eq!(stats.targets_released, 2);
    assert_eq!(stats.clears, 1);
    assert_eq!(stats.surfaces.retained_surfaces, 0);

    cache.clear();
    assert_eq!(cache.stats().targets_released, 2);
}
