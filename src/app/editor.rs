// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/editor.rs
//
// Editor state and message handling.

use kurbo::{Affine, Point, Rect};

use crate::app::message::{CommitOutcome, EditorMessage, TextRequest};
use crate::app::prompt::TextPrompt;
use crate::app::tool::{CompletedStroke, ToolController, ToolId};
use crate::config::AppConfig;
use crate::domain::document::compositor::{self, EncodedImage};
use crate::domain::document::operations::{
    AdjustmentParams, StrokeStyle, arrow, crop, parse_hex_color, pixelate, text,
};
use crate::domain::document::{DocResult, GlyphFace, HistoryStack, Surface};
use crate::domain::view::{ViewTransform, Viewport, display_affine, map_to_logical};
use crate::error::EditorError;

/// Receiver of the editor's final result.
pub trait EditorHost {
    fn on_save(&mut self, image: EncodedImage);
    fn on_cancel(&mut self);
}

enum LoadState {
    Pending,
    Ready(HistoryStack<Surface>),
    Failed(String),
}

/// One editing session over one source image.
pub struct Editor {
    config: AppConfig,
    state: LoadState,
    view: ViewTransform,
    viewport: Viewport,
    tools: ToolController,
    style: StrokeStyle,
    adjustments: AdjustmentParams,
    face: GlyphFace,
    pending_text: Option<TextRequest>,
}

impl Editor {
    /// New editor waiting for its image.
    pub fn new(config: AppConfig, viewport: Viewport) -> Self {
        let config = config.sanitized();
        let mut style = StrokeStyle::default();
        style.set_thickness(config.default_thickness);
        style.set_block_size(config.default_block_size);
        match parse_hex_color(&config.default_color) {
            Some(color) => style.color = color,
            None => log::warn!("Ignoring invalid default colour {:?}", config.default_color),
        }
        let face = GlyphFace::load_or_bitmap(config.font_path.as_deref());

        Self {
            view: ViewTransform::new(config.min_scale, config.max_scale),
            viewport,
            tools: ToolController::default(),
            style,
            adjustments: AdjustmentParams::default(),
            face,
            pending_text: None,
            state: LoadState::Pending,
            config,
        }
    }

    /// Decode `bytes` off the event loop and seed the history.
    pub async fn open(&mut self, bytes: Vec<u8>) -> Result<(), EditorError> {
        let fit = self.config.fit_box();
        let dpr = self.config.device_pixel_ratio;
        let decoded = match tokio::task::spawn_blocking(move || Surface::decode(&bytes, fit, dpr)).await {
            Ok(result) => result,
            Err(e) => Err(anyhow::Error::from(e).context("Decode task failed")),
        };
        self.finish_decode(decoded)
    }

    /// Resolve the pending decode. The first surface seeds the history; a
    /// failure leaves the editor permanently failed.
    pub fn finish_decode(&mut self, decoded: DocResult<Surface>) -> Result<(), EditorError> {
        if !matches!(self.state, LoadState::Pending) {
            log::warn!("Ignoring second decode result");
            return self.history().map(|_| ());
        }
        match decoded {
            Ok(surface) => {
                log::info!(
                    "Decoded {}x{} (device scale {})",
                    surface.logical_width(),
                    surface.logical_height(),
                    surface.device_scale()
                );
                self.state = LoadState::Ready(HistoryStack::with_limit(surface, self.config.history_limit));
                Ok(())
            }
            Err(e) => {
                let message = format!("{e:#}");
                log::error!("Failed to decode image: {message}");
                self.state = LoadState::Failed(message.clone());
                Err(EditorError::DecodeFailed(message))
            }
        }
    }

    fn history(&self) -> Result<&HistoryStack<Surface>, EditorError> {
        match &self.state {
            LoadState::Pending => Err(EditorError::NotReady),
            LoadState::Ready(history) => Ok(history),
            LoadState::Failed(message) => Err(EditorError::DecodeFailed(message.clone())),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready(_))
    }

    /// Decode error, if the image failed to load.
    pub fn load_error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Current surface, once decoded.
    pub fn surface(&self) -> Option<&Surface> {
        self.history().ok().map(HistoryStack::current)
    }

    /// Number of history snapshots (0 before decode).
    pub fn history_len(&self) -> usize {
        self.history().map_or(0, HistoryStack::len)
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn tool(&self) -> ToolId {
        self.tools.tool()
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn adjustments(&self) -> &AdjustmentParams {
        &self.adjustments
    }

    pub fn pending_text(&self) -> Option<TextRequest> {
        self.pending_text
    }

    /// Selection overlay for an active Pixelate or Crop drag (logical).
    pub fn preview_rect(&self) -> Option<Rect> {
        self.tools.preview_rect()
    }

    /// Logical-to-viewport transform for drawing the surface.
    pub fn display_transform(&self) -> Option<Affine> {
        let surface = self.surface()?;
        Some(display_affine(&self.view, self.viewport.center(), surface.logical_size()))
    }

    /// Where a logical point currently appears in the viewport.
    pub fn to_viewport(&self, logical: Point) -> Option<Point> {
        self.display_transform().map(|affine| affine * logical)
    }

    /// Viewport point to logical, against the current (post-crop) size.
    fn to_logical(&self, x: f64, y: f64) -> Option<Point> {
        let surface = self.surface()?;
        Some(map_to_logical(
            Point::new(x, y),
            &self.view,
            self.viewport.center(),
            surface.logical_size(),
        ))
    }

    pub fn update(&mut self, message: EditorMessage) -> CommitOutcome {
        match message {
            EditorMessage::SelectTool(tool) => {
                self.tools.select(tool);
                if self.pending_text.take().is_some() {
                    log::debug!("Dropped pending text request on tool switch");
                }
                log::debug!("Tool: {tool:?}");
                CommitOutcome::ViewChanged
            }

            EditorMessage::PointerDown { x, y } => {
                if self.pending_text.is_some() {
                    return CommitOutcome::Ignored;
                }
                match self.to_logical(x, y) {
                    Some(at) if self.tools.pointer_down(at) => CommitOutcome::ViewChanged,
                    _ => CommitOutcome::Ignored,
                }
            }
            EditorMessage::PointerMove { x, y } => match self.to_logical(x, y) {
                Some(at) if self.tools.pointer_move(at) => CommitOutcome::ViewChanged,
                _ => CommitOutcome::Ignored,
            },
            EditorMessage::PointerUp { x, y } => {
                let Some(at) = self.to_logical(x, y) else {
                    return CommitOutcome::Ignored;
                };
                match self.tools.pointer_up(at) {
                    Some(stroke) => self.commit(stroke),
                    None => CommitOutcome::Ignored,
                }
            }

            EditorMessage::Wheel(delta_y) => {
                let step = self.config.wheel_zoom_step;
                if delta_y > 0.0 {
                    self.view.zoom_by(-step);
                } else if delta_y < 0.0 {
                    self.view.zoom_by(step);
                } else {
                    return CommitOutcome::Ignored;
                }
                CommitOutcome::ViewChanged
            }
            EditorMessage::ZoomBy(delta) => {
                self.view.zoom_by(delta);
                CommitOutcome::ViewChanged
            }
            EditorMessage::ZoomIn => {
                self.view.zoom_by(self.config.button_zoom_step);
                CommitOutcome::ViewChanged
            }
            EditorMessage::ZoomOut => {
                self.view.zoom_by(-self.config.button_zoom_step);
                CommitOutcome::ViewChanged
            }
            EditorMessage::ResetZoom => {
                self.view.set_scale(1.0);
                CommitOutcome::ViewChanged
            }
            EditorMessage::Resize(viewport) => {
                self.viewport = viewport;
                CommitOutcome::ViewChanged
            }

            EditorMessage::RotateCw => {
                self.view.rotate_cw();
                CommitOutcome::ViewChanged
            }
            EditorMessage::FlipHorizontal => {
                self.view.toggle_flip_horizontal();
                CommitOutcome::ViewChanged
            }
            EditorMessage::FlipVertical => {
                self.view.toggle_flip_vertical();
                CommitOutcome::ViewChanged
            }

            EditorMessage::SetAdjustment(kind, value) => {
                self.adjustments.set(kind, value);
                CommitOutcome::ViewChanged
            }
            EditorMessage::SetThickness(thickness) => {
                self.style.set_thickness(thickness);
                CommitOutcome::ViewChanged
            }
            EditorMessage::SetBlockSize(block_size) => {
                self.style.set_block_size(block_size);
                CommitOutcome::ViewChanged
            }
            EditorMessage::SetColor(hex) => self.set_color(&hex),
            EditorMessage::PickPalette(index) => match self.config.palette.get(index).cloned() {
                Some(hex) => self.set_color(&hex),
                None => CommitOutcome::Ignored,
            },

            EditorMessage::Undo => {
                let LoadState::Ready(history) = &mut self.state else {
                    return CommitOutcome::Ignored;
                };
                if history.undo() {
                    // Strokes and text anchors refer to the surface just dropped.
                    self.tools.cancel();
                    self.pending_text = None;
                    log::debug!("Undo, {} snapshots left", history.len());
                    CommitOutcome::Undone
                } else {
                    CommitOutcome::Ignored
                }
            }
        }
    }

    fn set_color(&mut self, hex: &str) -> CommitOutcome {
        match parse_hex_color(hex) {
            Some(color) => {
                self.style.color = color;
                CommitOutcome::ViewChanged
            }
            None => {
                log::debug!("Ignoring invalid colour {hex:?}");
                CommitOutcome::Ignored
            }
        }
    }

    fn push(&mut self, tool: ToolId, next: Option<Surface>) -> CommitOutcome {
        let LoadState::Ready(history) = &mut self.state else {
            return CommitOutcome::Ignored;
        };
        match next {
            Some(surface) => {
                history.commit(surface);
                CommitOutcome::Committed(tool)
            }
            None => CommitOutcome::Rejected(tool),
        }
    }

    fn commit(&mut self, stroke: CompletedStroke) -> CommitOutcome {
        let Some(surface) = self.surface() else {
            return CommitOutcome::Ignored;
        };
        let next = match stroke.tool {
            ToolId::Arrow => Some(arrow::commit_arrow(surface, stroke.start, stroke.end, &self.style)),
            ToolId::Pixelate => {
                pixelate::commit_pixelate(surface, stroke.start, stroke.end, self.style.block_size)
            }
            ToolId::Crop => crop::commit_crop(surface, stroke.start, stroke.end),
            ToolId::Text => {
                let request = TextRequest { at: stroke.end };
                self.pending_text = Some(request);
                return CommitOutcome::TextRequested(request);
            }
            ToolId::Adjust | ToolId::Transform => return CommitOutcome::Ignored,
        };
        self.push(stroke.tool, next)
    }

    /// Answer the pending text request. Empty or absent text commits nothing.
    pub fn complete_text(&mut self, label: Option<String>) -> CommitOutcome {
        let Some(request) = self.pending_text.take() else {
            return CommitOutcome::Ignored;
        };
        let label = label.unwrap_or_default();
        let Some(surface) = self.surface() else {
            return CommitOutcome::Ignored;
        };
        match text::commit_text(surface, request.at, &label, &self.style, &self.face) {
            Some(next) => self.push(ToolId::Text, Some(next)),
            None => {
                log::debug!("Text request discarded");
                CommitOutcome::Discarded
            }
        }
    }

    /// Ask `prompt` for the pending label and commit it.
    pub async fn resolve_text(&mut self, prompt: &dyn TextPrompt) -> CommitOutcome {
        let Some(request) = self.pending_text else {
            return CommitOutcome::Ignored;
        };
        let label = prompt.request(request).await;
        self.complete_text(label)
    }

    /// Bake and encode the current state.
    pub fn export(&self) -> Result<EncodedImage, EditorError> {
        let surface = self.history()?.current();
        compositor::export(surface, &self.view, &self.adjustments, self.config.jpeg_quality)
            .map_err(|e| EditorError::Encode(format!("{e:#}")))
    }

    /// Export and hand the result to the host. Ends the session.
    pub fn save(self, host: &mut impl EditorHost) -> Result<(), EditorError> {
        let image = self.export()?;
        host.on_save(image);
        Ok(())
    }

    /// Discard all edits. Ends the session.
    pub fn cancel(self, host: &mut impl EditorHost) {
        log::info!("Editing cancelled after {} snapshots", self.history_len());
        host.on_cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn ready(w: u32, h: u32) -> Editor {
        let mut editor = Editor::new(AppConfig::default(), Viewport::new(f64::from(w), f64::from(h)));
        let surface = Surface::new(w, h, 1.0, RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])));
        editor.finish_decode(surface.ok_or_else(|| anyhow::anyhow!("bad surface"))).unwrap();
        editor
    }

    fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) -> CommitOutcome {
        editor.update(EditorMessage::PointerDown { x: from.0, y: from.1 });
        editor.update(EditorMessage::PointerMove { x: to.0, y: to.1 });
        editor.update(EditorMessage::PointerUp { x: to.0, y: to.1 })
    }

    #[test]
    fn pending_editor_ignores_input() {
        let mut editor = Editor::new(AppConfig::default(), Viewport::new(100.0, 100.0));
        editor.update(EditorMessage::SelectTool(ToolId::Arrow));
        assert_eq!(drag(&mut editor, (10.0, 10.0), (50.0, 50.0)), CommitOutcome::Ignored);
        assert_eq!(editor.update(EditorMessage::Undo), CommitOutcome::Ignored);
        assert_eq!(editor.export(), Err(EditorError::NotReady));
        assert_eq!(editor.history_len(), 0);
    }

    #[test]
    fn failed_decode_is_sticky() {
        let mut editor = Editor::new(AppConfig::default(), Viewport::new(100.0, 100.0));
        let err = editor.finish_decode(Err(anyhow::anyhow!("truncated"))).unwrap_err();
        assert!(matches!(err, EditorError::DecodeFailed(_)));
        assert!(matches!(editor.export(), Err(EditorError::DecodeFailed(_))));
        assert_eq!(editor.load_error(), Some("truncated"));
    }

    #[test]
    fn arrow_commits_a_snapshot() {
        let mut editor = ready(100, 100);
        editor.update(EditorMessage::SelectTool(ToolId::Arrow));
        assert_eq!(drag(&mut editor, (10.0, 10.0), (80.0, 80.0)), CommitOutcome::Committed(ToolId::Arrow));
        assert_eq!(editor.history_len(), 2);
    }

    #[test]
    fn rejected_strokes_leave_history_alone() {
        let mut editor = ready(100, 100);
        editor.update(EditorMessage::SelectTool(ToolId::Crop));
        assert_eq!(drag(&mut editor, (10.0, 10.0), (20.0, 90.0)), CommitOutcome::Rejected(ToolId::Crop));
        editor.update(EditorMessage::SelectTool(ToolId::Pixelate));
        assert_eq!(drag(&mut editor, (10.0, 10.0), (11.0, 90.0)), CommitOutcome::Rejected(ToolId::Pixelate));
        assert_eq!(editor.history_len(), 1);
    }

    #[test]
    fn transform_and_adjust_do_not_push() {
        let mut editor = ready(100, 100);
        for tool in [ToolId::Adjust, ToolId::Transform] {
            editor.update(EditorMessage::SelectTool(tool));
            assert_eq!(drag(&mut editor, (10.0, 10.0), (80.0, 80.0)), CommitOutcome::Ignored);
        }
        editor.update(EditorMessage::RotateCw);
        editor.update(EditorMessage::FlipVertical);
        editor.update(EditorMessage::SetAdjustment(
            crate::domain::document::operations::AdjustmentKind::Contrast,
            150,
        ));
        assert_eq!(editor.history_len(), 1);
    }

    #[test]
    fn wheel_direction_and_clamp() {
        let mut editor = ready(10, 10);
        editor.update(EditorMessage::Wheel(1.0));
        assert!((editor.view().scale() - 0.9).abs() < 1e-9);
        for _ in 0..100 {
            editor.update(EditorMessage::Wheel(1.0));
        }
        assert_eq!(editor.view().scale(), 0.5);
        for _ in 0..100 {
            editor.update(EditorMessage::ZoomIn);
        }
        assert_eq!(editor.view().scale(), 8.0);
        editor.update(EditorMessage::ResetZoom);
        assert_eq!(editor.view().scale(), 1.0);
        assert_eq!(editor.update(EditorMessage::Wheel(0.0)), CommitOutcome::Ignored);
    }

    #[test]
    fn out_of_range_zoom_config_still_clamps() {
        let config = AppConfig::from_toml("min_scale = 0.1\nmax_scale = 20.0\n").unwrap();
        let mut editor = Editor::new(config, Viewport::new(10.0, 10.0));
        for _ in 0..100 {
            editor.update(EditorMessage::ZoomOut);
            assert!((0.5..=8.0).contains(&editor.view().scale()));
        }
        assert_eq!(editor.view().scale(), 0.5);
        for _ in 0..200 {
            editor.update(EditorMessage::ZoomIn);
            assert!((0.5..=8.0).contains(&editor.view().scale()));
        }
        assert_eq!(editor.view().scale(), 8.0);
    }

    #[test]
    fn undo_drops_the_stroke_in_progress() {
        let mut editor = ready(100, 100);
        editor.update(EditorMessage::SelectTool(ToolId::Arrow));
        drag(&mut editor, (10.0, 10.0), (80.0, 80.0));
        editor.update(EditorMessage::SelectTool(ToolId::Crop));
        editor.update(EditorMessage::PointerDown { x: 5.0, y: 5.0 });
        editor.update(EditorMessage::PointerMove { x: 60.0, y: 60.0 });
        assert!(editor.preview_rect().is_some());

        assert_eq!(editor.update(EditorMessage::Undo), CommitOutcome::Undone);
        assert!(editor.preview_rect().is_none());
        assert_eq!(
            editor.update(EditorMessage::PointerUp { x: 60.0, y: 60.0 }),
            CommitOutcome::Ignored
        );
        assert_eq!(editor.history_len(), 1);
    }

    #[test]
    fn display_transform_centres_the_surface() {
        let editor = ready(100, 60);
        let affine = editor.display_transform().unwrap();
        assert_eq!(affine * Point::new(50.0, 30.0), editor.viewport().center());
        assert_eq!(editor.to_viewport(Point::new(0.0, 0.0)), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn text_waits_for_its_label() {
        let mut editor = ready(100, 100);
        editor.update(EditorMessage::SelectTool(ToolId::Text));
        let outcome = drag(&mut editor, (10.0, 10.0), (20.0, 60.0));
        assert_eq!(
            outcome,
            CommitOutcome::TextRequested(TextRequest {
                at: Point::new(20.0, 60.0)
            })
        );
        assert_eq!(editor.history_len(), 1);
        assert_eq!(editor.complete_text(Some("A1".into())), CommitOutcome::Committed(ToolId::Text));
        assert_eq!(editor.history_len(), 2);
    }

    #[test]
    fn empty_text_is_discarded() {
        let mut editor = ready(100, 100);
        editor.update(EditorMessage::SelectTool(ToolId::Text));
        drag(&mut editor, (10.0, 10.0), (20.0, 60.0));
        assert_eq!(editor.complete_text(Some(String::new())), CommitOutcome::Discarded);
        drag(&mut editor, (10.0, 10.0), (20.0, 60.0));
        assert_eq!(editor.complete_text(None), CommitOutcome::Discarded);
        assert_eq!(editor.history_len(), 1);
        assert_eq!(editor.complete_text(Some("late".into())), CommitOutcome::Ignored);
    }

    #[test]
    fn tool_switch_drops_pending_text() {
        let mut editor = ready(100, 100);
        editor.update(EditorMessage::SelectTool(ToolId::Text));
        drag(&mut editor, (10.0, 10.0), (20.0, 60.0));
        editor.update(EditorMessage::SelectTool(ToolId::Arrow));
        assert!(editor.pending_text().is_none());
        assert_eq!(editor.complete_text(Some("x".into())), CommitOutcome::Ignored);
    }

    #[test]
    fn palette_and_hex_colours() {
        let mut editor = ready(10, 10);
        editor.update(EditorMessage::PickPalette(3));
        assert_eq!(editor.style().color, Rgba([0x22, 0xc5, 0x5e, 0xff]));
        assert_eq!(editor.update(EditorMessage::PickPalette(99)), CommitOutcome::Ignored);
        assert_eq!(editor.update(EditorMessage::SetColor("nope".into())), CommitOutcome::Ignored);
        editor.update(EditorMessage::SetColor("#000000".into()));
        assert_eq!(editor.style().color, Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn undo_floor_is_one() {
        let mut editor = ready(50, 50);
        assert_eq!(editor.update(EditorMessage::Undo), CommitOutcome::Ignored);
        assert_eq!(editor.history_len(), 1);
    }

    struct Recorder {
        saved: Option<EncodedImage>,
        cancelled: bool,
    }

    impl EditorHost for Recorder {
        fn on_save(&mut self, image: EncodedImage) {
            self.saved = Some(image);
        }

        fn on_cancel(&mut self) {
            self.cancelled = true;
        }
    }

    #[test]
    fn save_and_cancel_reach_the_host() {
        let mut host = Recorder {
            saved: None,
            cancelled: false,
        };
        ready(20, 10).save(&mut host).unwrap();
        assert!(host.saved.as_ref().is_some_and(|image| image.mime == "image/jpeg"));
        ready(20, 10).cancel(&mut host);
        assert!(host.cancelled);
    }
}
