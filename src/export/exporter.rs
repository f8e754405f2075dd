use std::path::{Path, PathBuf};

use crate::encode::sink::SinkConfig;
use crate::export::cancel::CancelToken;
use crate::export::config::ExportConfig;
use crate::export::format::ExportFormat;
use crate::export::naming::{file_name, timestamp_now};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ExportError, ExportResult};
use crate::model::Renderable;
use crate::render::compositor::{CompositorStats, FrameCompositor};
use crate::render::surface_pool::SurfacePoolOpts;
use crate::render::target_cache::{CacheStats, RenderTargetCache};

/// Outcome of one [`Exporter::export`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Outputs written successfully, in processing order.
    pub written: Vec<PathBuf>,
    /// Outputs whose unit failed; each failure was logged.
    pub failed: Vec<PathBuf>,
    /// Whether the run stopped early on a cancellation request.
    pub cancelled: bool,
}

/// Drives one export format over a list of models.
///
/// An exporter owns its geometry cache and compositor; both are reset around every call, so
/// nothing rendered in one call survives into the next.
pub struct Exporter {
    config: ExportConfig,
    format: Box<dyn ExportFormat>,
    cache: RenderTargetCache,
    compositor: FrameCompositor,
    timestamp: String,
}

impl Exporter {
    pub fn new(config: ExportConfig, format: Box<dyn ExportFormat>) -> Self {
        Self::with_pool(config, format, SurfacePoolOpts::default())
    }

    pub fn with_pool(
        config: ExportConfig,
        format: Box<dyn ExportFormat>,
        pool: SurfacePoolOpts,
    ) -> Self {
        Self {
            config,
            format,
            cache: RenderTargetCache::new(pool),
            compositor: FrameCompositor::new(),
            timestamp: timestamp_now(),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ExportConfig {
        &mut self.config
    }

    pub fn format(&self) -> &dyn ExportFormat {
        self.format.as_ref()
    }

    /// Timestamp used in file names by the most recent export.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn compositor_stats(&self) -> CompositorStats {
        self.compositor.stats()
    }

    /// Whether the compositor still holds render state from a previous run.
    pub fn has_render_context(&self) -> bool {
        self.compositor.has_context()
    }

    /// Shared configuration checks, then the format's own. `None` means valid.
    pub fn validate(&mut self) -> Option<String> {
        self.config.validate().or_else(|| self.format.validate())
    }

    /// Export `models`, listed front to back as in a viewer's model list.
    ///
    /// Models are drawn back to front: the filtered list is reversed before rendering. Failures
    /// of individual outputs are logged and reported but do not stop the run; only a failed
    /// validation is returned as an error.
    #[tracing::instrument(skip_all, fields(format = self.format.name(), models = models.len()))]
    pub fn export(
        &mut self,
        models: &mut [Box<dyn Renderable>],
        cancel: Option<&CancelToken>,
    ) -> ExportResult<ExportReport> {
        if let Some(reason) = self.validate() {
            return Err(ExportError::validation(reason));
        }

        let selected_only = self.config.render_selected_only;
        let mut to_render: Vec<&mut dyn Renderable> = models
            .iter_mut()
            .map(|m| -> &mut dyn Renderable { m.as_mut() })
            .filter(|m| !selected_only || m.is_selected())
            .collect();
        to_render.reverse();

        let mut report = ExportReport::default();
        if to_render.is_empty() {
            tracing::info!("nothing to export");
            return Ok(report);
        }

        self.timestamp = timestamp_now();
        self.cache.clear();
        self.compositor.clear();
        if self.config.export_single {
            self.export_combined(&mut to_render, &mut report);
        } else {
            self.export_individual(&mut to_render, cancel, &mut report);
        }
        self.cache.clear();
        self.compositor.clear();

        tracing::info!(
            written = report.written.len(),
            failed = report.failed.len(),
            cancelled = report.cancelled,
            "export finished"
        );
        Ok(report)
    }

    fn export_combined(&mut self, models: &mut [&mut dyn Renderable], report: &mut ExportReport) {
        let Some(dir) = self.config.output_dir.clone() else {
            return;
        };
        let path = dir.join(self.output_name(self.format.tag()));

        match self.export_unit(models, &path) {
            Ok(()) => report.written.push(path),
            Err(e) => {
                tracing::error!(
                    format = self.format.name(),
                    path = %path.display(),
                    error = %e,
                    "combined export failed"
                );
                report.failed.push(path);
            }
        }
    }

    fn export_individual(
        &mut self,
        models: &mut [&mut dyn Renderable],
        cancel: Option<&CancelToken>,
        report: &mut ExportReport,
    ) {
        for model in models.iter_mut() {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                tracing::info!("export cancelled");
                report.cancelled = true;
                break;
            }

            let dir = self
                .config
                .output_dir
                .clone()
                .unwrap_or_else(|| model.assets_dir().to_path_buf());
            let path = dir.join(self.output_name(model.name()));
            let source = model.source_path().to_path_buf();

            match self.export_unit(std::slice::from_mut(model), &path) {
                Ok(()) => report.written.push(path),
                Err(e) => {
                    tracing::error!(
                        format = self.format.name(),
                        path = %path.display(),
                        source = %source.display(),
                        error = %e,
                        "export failed"
                    );
                    report.failed.push(path);
                }
            }
        }
    }

    fn output_name(&self, stem: &str) -> String {
        file_name(
            stem,
            &self.timestamp,
            self.format.file_name_fps(),
            &self.format.file_name_note_suffix(),
            &self.format.suffix(),
        )
    }

    /// Render every frame of one unit into one sink.
    fn export_unit(&mut self, models: &mut [&mut dyn Renderable], path: &Path) -> ExportResult<()> {
        let timing = self.format.timing();
        let frame_count = timing.frame_count(models);
        let delta = timing.frame_delta();

        let target = {
            let view: Vec<&dyn Renderable> = models.iter().map(|m| &**m).collect();
            self.cache.target_for(&self.config, &view)?
        };

        let mut sink = self.format.open_sink(path)?;
        sink.begin(SinkConfig {
            width: target.width,
            height: target.height,
            fps: timing.fps(),
        })?;

        for i in 0..frame_count {
            let frame = {
                let view: Vec<&dyn Renderable> = models.iter().map(|m| &**m).collect();
                self.compositor
                    .compose(&mut self.cache, &self.config, &view)?
            };
            sink.push_frame(FrameIndex(i), &frame)?;

            if delta > 0.0 {
                for m in models.iter_mut() {
                    m.update(delta);
                }
            }
        }

        sink.end()?;
        tracing::debug!(path = %path.display(), frames = frame_count, "unit written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
