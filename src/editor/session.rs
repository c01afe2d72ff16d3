//! # 会话状态模块
//!
//! ## 设计思路
//!
//! 编辑器只有三个可观测字段：源图片、渐变颜色、不透明度。
//! 没有隐式的响应式依赖追踪，每个 setter 在改完字段后显式调用 `recomposite()`。
//!
//! ```text
//! {无图片} ──(解码成功)──> {有图片，画布有效} ──(调色 / 调透明度)──┐
//!                               ^                                     │
//!                               └─────────────────────────────────────┘
//! ```
//!
//! 无图片时修改颜色或透明度只会更新字段，不产生画布，也不允许导出。
//!
//! 每次状态变化递增 `revision`，推送层据此丢弃过期的画面。
//! 替换源图片时先合成，成功后才把源图片与画布一起换上；失败则保持原状态。

use std::sync::Arc;

use serde::Serialize;

use super::compositor::{self, CompositeSurface};
use super::{EditorConfig, EditorError, GradientColor, GradientOverlay, Opacity, SourceImage};

/// 编辑器会话。
pub struct EditorSession {
    source: Option<Arc<SourceImage>>,
    overlay: GradientOverlay,
    surface: Option<CompositeSurface>,
    revision: u64,
}

type RenderFn = fn(&SourceImage, &GradientOverlay) -> Result<CompositeSurface, EditorError>;

/// 面向前端的状态视图。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    /// 状态版本号，单调递增。
    pub revision: u64,
    pub gradient_color: GradientColor,
    pub opacity: u8,
    pub has_image: bool,
    pub can_export: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl EditorSession {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            source: None,
            overlay: GradientOverlay::new(config.default_gradient_color, config.default_opacity),
            surface: None,
            revision: 0,
        }
    }

    /// 整体替换源图片并重绘。
    pub fn set_source_image(&mut self, image: Arc<SourceImage>) -> Result<(), EditorError> {
        log::debug!("🖼️ 替换源图片 - {}x{}", image.width(), image.height());
        self.recomposite_with(Some(image), compositor::composite)
    }

    pub fn set_gradient_color(&mut self, color: GradientColor) -> Result<(), EditorError> {
        self.overlay.color = color;
        self.recomposite()
    }

    pub fn set_opacity(&mut self, opacity: Opacity) -> Result<(), EditorError> {
        self.overlay.opacity = opacity;
        self.recomposite()
    }

    pub fn surface(&self) -> Option<&CompositeSurface> {
        self.surface.as_ref()
    }

    /// 仅在已有源图片时允许导出。
    pub fn can_export(&self) -> bool {
        self.source.is_some() && self.surface.is_some()
    }

    pub fn view(&self) -> EditorView {
        EditorView {
            revision: self.revision,
            gradient_color: self.overlay.color,
            opacity: self.overlay.opacity.percent(),
            has_image: self.source.is_some(),
            can_export: self.can_export(),
            width: self.surface.as_ref().map(CompositeSurface::width),
            height: self.surface.as_ref().map(CompositeSurface::height),
        }
    }

    /// 全量重绘。无源图片时只递增版本号。
    fn recomposite(&mut self) -> Result<(), EditorError> {
        self.recomposite_with(None, compositor::composite)
    }

    /// `replacement` 为新源图片时，合成失败不改动任何状态；
    /// 仅调参时合成失败会清空画布，不保留旧参数的结果。
    fn recomposite_with(
        &mut self,
        replacement: Option<Arc<SourceImage>>,
        render: RenderFn,
    ) -> Result<(), EditorError> {
        let replacing = replacement.is_some();
        let Some(source) = replacement.or_else(|| self.source.clone()) else {
            self.revision += 1;
            return Ok(());
        };

        match render(&source, &self.overlay) {
            Ok(surface) => {
                self.source = Some(source);
                self.surface = Some(surface);
                self.revision += 1;
                Ok(())
            }
            Err(err) => {
                if !replacing {
                    self.surface = None;
                    self.revision += 1;
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32) -> Arc<SourceImage> {
        Arc::new(
            SourceImage::from_rgba(RgbaImage::from_pixel(width, height, Rgba([90, 90, 90, 255])))
                .expect("valid source image"),
        )
    }

    #[test]
    fn edits_before_image_have_no_surface() {
        let mut session = EditorSession::new(&EditorConfig::default());
        session
            .set_gradient_color(GradientColor::from_rgb(255, 0, 0))
            .expect("set color");
        session.set_opacity(Opacity::new(90).expect("valid")).expect("set opacity");

        assert!(session.surface().is_none());
        assert!(!session.can_export());

        let view = session.view();
        assert_eq!(view.gradient_color.to_hex(), "#ff0000");
        assert_eq!(view.opacity, 90);
        assert_eq!(view.width, None);
    }

    #[test]
    fn stored_parameters_apply_once_image_arrives() {
        let mut session = EditorSession::new(&EditorConfig::default());
        session.set_opacity(Opacity::new(0).expect("valid")).expect("set opacity");
        session.set_source_image(solid(3, 3)).expect("set image");

        let surface = session.surface().expect("surface exists");
        assert_eq!(surface.pixel(1, 2), Some([90, 90, 90, 255]));
        assert!(session.can_export());
    }

    #[test]
    fn replacing_image_resizes_surface() {
        let mut session = EditorSession::new(&EditorConfig::default());
        session.set_source_image(solid(10, 20)).expect("first image");
        session.set_source_image(solid(7, 3)).expect("second image");

        let view = session.view();
        assert_eq!((view.width, view.height), (Some(7), Some(3)));
    }

    fn failing_render(
        _source: &SourceImage,
        _overlay: &GradientOverlay,
    ) -> Result<CompositeSurface, EditorError> {
        Err(EditorError::Render("画布创建失败".to_string()))
    }

    #[test]
    fn failed_replacement_keeps_previous_image() {
        let mut session = EditorSession::new(&EditorConfig::default());
        session.set_source_image(solid(10, 20)).expect("first image");
        let before = session.view();

        let result = session.recomposite_with(Some(solid(7, 3)), failing_render);

        assert!(matches!(result, Err(EditorError::Render(_))));
        assert_eq!(session.view(), before);
        assert!(session.can_export());
    }

    #[test]
    fn failed_first_image_leaves_session_empty() {
        let mut session = EditorSession::new(&EditorConfig::default());

        let result = session.recomposite_with(Some(solid(4, 4)), failing_render);

        assert!(result.is_err());
        let view = session.view();
        assert!(!view.has_image);
        assert!(!view.can_export);
    }

    #[test]
    fn every_edit_advances_revision() {
        let mut session = EditorSession::new(&EditorConfig::default());
        assert_eq!(session.view().revision, 0);

        session.set_opacity(Opacity::new(10).expect("valid")).expect("set opacity");
        session.set_source_image(solid(2, 2)).expect("set image");
        session
            .set_gradient_color(GradientColor::from_rgb(1, 2, 3))
            .expect("set color");

        assert_eq!(session.view().revision, 3);
    }

    #[test]
    fn view_serializes_camel_case() {
        let session = EditorSession::new(&EditorConfig::default());
        let json = serde_json::to_value(session.view()).expect("serialize view");
        assert_eq!(json["gradientColor"], "#000000");
        assert_eq!(json["opacity"], 50);
        assert_eq!(json["canExport"], false);
    }
}
