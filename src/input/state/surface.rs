//! History, restore sequencing, export and compositing.

use crate::draw::{PixelFrame, SurfaceError, render};
use crate::history::{RestoreFailed, RestoreOutcome, RestoreWorker};
use cairo::{Format, ImageSurface, Operator};
use log::{debug, info, warn};

use super::{DrawingState, InputState};

/// Layers included by [`InputState::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLayers {
    /// Background fill, grid and image
    pub background: bool,
    /// Live shape preview
    pub preview: bool,
    /// Open text box with caret
    pub text_overlay: bool,
}

impl Default for RenderLayers {
    fn default() -> Self {
        Self {
            background: true,
            preview: true,
            text_overlay: true,
        }
    }
}

impl RenderLayers {
    /// Only the committed raster.
    pub fn committed_only() -> Self {
        Self {
            background: false,
            preview: false,
            text_overlay: false,
        }
    }
}

impl InputState {
    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Snapshots the raster and records it as the newest history entry.
    pub(crate) fn record_commit(&mut self) -> Result<(), SurfaceError> {
        let surfaces = self.surfaces.as_mut().ok_or(SurfaceError::NotMounted)?;
        let snapshot = surfaces.raster.export_snapshot()?;
        let bytes = snapshot.len();
        self.history.record(snapshot);
        debug!(
            "Recorded snapshot ({} bytes, history holds {} bytes)",
            bytes,
            self.history.memory_bytes()
        );
        self.dirty_tracker.mark_full();
        self.needs_redraw = true;
        Ok(())
    }

    /// Brings the raster in line with the history cursor.
    ///
    /// The empty state applies immediately; any other state issues a
    /// sequenced restore that is applied when its decode completes.
    pub(crate) fn apply_history_cursor(&mut self) {
        match self.history.current().cloned() {
            None => {
                let seq = self.restores.settle_empty();
                debug!("History cursor at empty state (restore #{})", seq);
                if let Some(surfaces) = self.surfaces.as_mut()
                    && let Err(err) = surfaces.raster.clear()
                {
                    warn!("Failed to clear raster: {}", err);
                }
                self.dirty_tracker.mark_full();
                self.needs_redraw = true;
            }
            Some(snapshot) => {
                if let Some(completion) = self.restores.request(snapshot)
                    && let Some(outcome) = self.restores.accept(completion)
                {
                    self.apply_restore_outcome(outcome);
                }
            }
        }
    }

    /// Applies a decoded restore, or records why it could not be applied.
    ///
    /// The raster is only replaced with a successfully decoded frame, so a
    /// failure leaves the last-good content on screen.
    fn apply_restore_outcome(&mut self, outcome: RestoreOutcome) {
        let applied = outcome.and_then(|restored| {
            let seq = restored.seq;
            let surfaces = self.surfaces.as_mut().ok_or(SurfaceError::NotMounted);
            surfaces
                .and_then(|s| s.raster.replace_with(&restored.frame))
                .map(|()| seq)
                .map_err(|err| RestoreFailed {
                    seq,
                    reason: err.to_string(),
                })
        });
        match applied {
            Ok(seq) => {
                debug!("Applied restore #{}", seq);
                self.dirty_tracker.mark_full();
                self.needs_redraw = true;
            }
            Err(failed) => {
                warn!("{}; keeping the last frame", failed);
                self.restore_failure = Some(failed);
            }
        }
    }

    /// Applies a finished restore without blocking.
    ///
    /// Hosts using a [`RestoreWorker`] call this from their event loop.
    /// Returns true when the raster changed.
    pub fn poll_restores(&mut self) -> bool {
        match self.restores.poll() {
            Some(outcome) => {
                let ok = outcome.is_ok();
                self.apply_restore_outcome(outcome);
                ok
            }
            None => false,
        }
    }

    /// Waits (up to the configured timeout) for the in-flight restore and
    /// applies it. Called before anything reads or mutates the raster.
    pub fn settle_restores(&mut self) {
        if let Some(outcome) = self.restores.settle(self.restore_timeout) {
            self.apply_restore_outcome(outcome);
        }
    }

    /// True while a restore has been requested but not applied.
    pub fn restore_pending(&self) -> bool {
        self.restores.is_pending()
    }

    /// Takes the most recent restore failure.
    pub fn take_restore_failure(&mut self) -> Option<RestoreFailed> {
        self.restore_failure.take()
    }

    /// Decodes subsequent restores on a background worker.
    pub fn attach_restore_worker(&mut self, worker: RestoreWorker) {
        self.settle_restores();
        self.restores.attach_worker(worker);
        info!("Asynchronous history restores enabled");
    }

    /// Steps the history back one commit. A gesture in progress is committed
    /// first. Returns false at the empty state.
    pub fn undo(&mut self) -> bool {
        self.end_active_gesture();
        if !self.history.undo() {
            debug!("Undo ignored: already at empty state");
            return false;
        }
        info!("Undo -> history index {}", self.history.index());
        self.apply_history_cursor();
        true
    }

    /// Steps the history forward one commit. Returns false when nothing is
    /// redo-available.
    pub fn redo(&mut self) -> bool {
        self.end_active_gesture();
        if !self.history.redo() {
            debug!("Redo ignored: no future state");
            return false;
        }
        info!("Redo -> history index {}", self.history.index());
        self.apply_history_cursor();
        true
    }

    /// Wipes the canvas and the history.
    ///
    /// Also drops the background image when `clear_drops_background_image`
    /// is set; the background mode is kept.
    pub fn clear(&mut self) {
        self.end_active_gesture();
        self.history.clear();
        self.apply_history_cursor();
        if self.clear_drops_background_image && self.background.image.take().is_some() {
            debug!("Clear removed the background image");
        }
        self.dirty_tracker.mark_full();
        self.needs_redraw = true;
        info!("Canvas cleared");
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// History cursor in `[-1, len - 1]`; `-1` is the empty canvas.
    pub fn history_index(&self) -> isize {
        self.history.index()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // ------------------------------------------------------------------
    // Export and compositing
    // ------------------------------------------------------------------

    /// Copies the committed raster pixels.
    pub fn committed_frame(&mut self) -> Result<PixelFrame, SurfaceError> {
        self.settle_restores();
        self.surfaces
            .as_mut()
            .ok_or(SurfaceError::NotMounted)?
            .raster
            .frame()
    }

    /// PNG of the committed drawing, with the background layers underneath
    /// when `export.include_background` is set.
    ///
    /// Never contains the shape preview or an open text box.
    pub fn export_current_frame(&mut self) -> Result<Vec<u8>, SurfaceError> {
        self.export_frame(self.include_background_on_export)
    }

    /// PNG of the committed drawing, optionally over the background layers.
    pub fn export_frame(&mut self, include_background: bool) -> Result<Vec<u8>, SurfaceError> {
        if self.surfaces.is_none() {
            warn!("Export requested before the surface was mounted");
            return Err(SurfaceError::NotMounted);
        }
        self.settle_restores();
        let surfaces = self.surfaces.as_ref().ok_or(SurfaceError::NotMounted)?;

        if !include_background || self.background.is_empty() {
            return surfaces.raster.to_png();
        }

        let (width, height) = (surfaces.raster.width(), surfaces.raster.height());
        let composite = ImageSurface::create(Format::ARgb32, width, height)?;
        {
            let ctx = cairo::Context::new(&composite)?;
            self.background
                .render(&ctx, &self.background_config, width as f64, height as f64)?;
            ctx.set_operator(Operator::Over);
            ctx.set_source_surface(surfaces.raster.surface(), 0.0, 0.0)?;
            ctx.paint()?;
        }
        let mut bytes = Vec::new();
        composite.write_to_png(&mut bytes)?;
        Ok(bytes)
    }

    /// Composites the session for display.
    ///
    /// Order: background, committed raster, shape preview, text overlay. The
    /// overlays are drawn onto `ctx` only, never into the raster.
    pub fn render(&self, ctx: &cairo::Context, layers: RenderLayers) -> Result<(), SurfaceError> {
        let surfaces = self.surfaces.as_ref().ok_or(SurfaceError::NotMounted)?;
        let (width, height) = (surfaces.raster.width() as f64, surfaces.raster.height() as f64);

        ctx.save()?;
        if layers.background {
            self.background
                .render(ctx, &self.background_config, width, height)?;
        }

        ctx.set_operator(Operator::Over);
        ctx.set_source_surface(surfaces.raster.surface(), 0.0, 0.0)?;
        ctx.paint()?;

        if layers.preview && !surfaces.preview.is_blank() {
            ctx.set_source_surface(surfaces.preview.surface(), 0.0, 0.0)?;
            ctx.paint()?;
        }

        if layers.text_overlay
            && let DrawingState::Typing(session) = &self.state
        {
            render::render_text_preview(
                ctx,
                session.anchor,
                &session.content,
                &session.style,
                &self.font,
            )?;
        }
        ctx.restore()?;
        Ok(())
    }
}
