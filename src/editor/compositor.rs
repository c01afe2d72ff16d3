//! # 合成模块
//!
//! 每次合成都从一张全新的透明画布开始：
//!
//! 1. 画布尺寸 = 源图片尺寸
//! 2. 在原点绘制源图片
//! 3. 用纵向线性渐变填满整个画布：`(0, height)` 为 stop 0（颜色 + alpha），
//!    `(0, 0)` 为 stop 1（同色，alpha = 0）
//!
//! 不做增量更新，因此旧参数的渐变不会残留。

use std::io::Cursor;
use std::time::Instant;

use image::{ImageFormat, RgbaImage};
use tiny_skia::{
    Color, GradientStop, LinearGradient, Paint, Pixmap, PixmapPaint, Point, Rect, SpreadMode,
    Transform,
};

use super::gradient::ColorStop;
use super::{EditorError, GradientOverlay, PngBlob, SourceImage};

/// 合成后的画布。
#[derive(Debug, Clone)]
pub struct CompositeSurface {
    pixmap: Pixmap,
}

impl CompositeSurface {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// 读取单个像素（非预乘 RGBA）。越界返回 `None`。
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// 转为非预乘 RGBA 位图。
    pub fn to_rgba_image(&self) -> Result<RgbaImage, EditorError> {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let color = px.demultiply();
            data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }

        RgbaImage::from_raw(self.width(), self.height(), data)
            .ok_or_else(|| EditorError::Render("画布像素数据长度异常".to_string()))
    }

    /// 编码为 PNG。
    pub fn encode_png(&self) -> Result<PngBlob, EditorError> {
        let rgba = self.to_rgba_image()?;
        let mut cursor = Cursor::new(Vec::new());
        rgba.write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| EditorError::Render(format!("PNG 编码失败：{}", e)))?;

        Ok(PngBlob {
            width: self.width(),
            height: self.height(),
            bytes: cursor.into_inner(),
        })
    }
}

fn to_skia_stop(stop: ColorStop) -> GradientStop {
    GradientStop::new(
        stop.position,
        Color::from_rgba8(stop.color.red(), stop.color.green(), stop.color.blue(), stop.alpha),
    )
}

/// 完整重绘：源图片 + 渐变叠加层。
pub fn composite(source: &SourceImage, overlay: &GradientOverlay) -> Result<CompositeSurface, EditorError> {
    let start = Instant::now();
    let width = source.width();
    let height = source.height();

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| EditorError::Render(format!("无法创建 {}x{} 画布", width, height)))?;

    pixmap.draw_pixmap(
        0,
        0,
        source.pixmap(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );

    let [bottom, top] = overlay.stops();
    let shader = LinearGradient::new(
        Point::from_xy(0.0, height as f32),
        Point::from_xy(0.0, 0.0),
        vec![to_skia_stop(bottom), to_skia_stop(top)],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(|| EditorError::Render("无法创建线性渐变".to_string()))?;

    let mut paint = Paint::default();
    paint.shader = shader;
    paint.anti_alias = false;

    let rect = Rect::from_xywh(0.0, 0.0, width as f32, height as f32)
        .ok_or_else(|| EditorError::Render("渐变填充区域无效".to_string()))?;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);

    log::debug!(
        "🎨 合成完成 - {}x{} stop0={} stop1={} 耗时: {}ms",
        width,
        height,
        bottom.to_hex(),
        top.to_hex(),
        start.elapsed().as_millis()
    );

    Ok(CompositeSurface { pixmap })
}
