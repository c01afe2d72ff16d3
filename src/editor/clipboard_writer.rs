//! # 系统剪贴板读写模块
//!
//! ## 设计思路
//!
//! 与操作系统剪贴板交互的逻辑独立在 `ClipboardBackend` 之后，
//! 编排层只依赖 trait，测试可以换成内存实现。
//!
//! ## 实现思路
//!
//! - 导出：PNG 字节 → RGBA → `arboard::set_image`，由 arboard 以 `image/png` 形式提供给其他应用。
//! - 读取：`arboard::get_image`，剪贴板里没有图片时返回 `Ok(None)`。
//! - 调用方负责把这些阻塞调用放到 `spawn_blocking` 中执行。
//! - 写入失败不重试。

use std::borrow::Cow;

use image::ImageFormat;

use super::{EditorError, PngBlob, SourceImage};

/// 剪贴板后端。
pub trait ClipboardBackend: Send + Sync {
    /// 将 PNG 图片写入剪贴板。
    fn write_png(&self, png: &PngBlob) -> Result<(), EditorError>;

    /// 读取剪贴板中的图片；没有图片时返回 `Ok(None)`。
    fn read_image(&self) -> Result<Option<SourceImage>, EditorError>;
}

/// 基于 `arboard` 的系统剪贴板。
///
/// 每次操作临时打开一个 `arboard::Clipboard`，不跨线程持有句柄。
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    fn open() -> Result<arboard::Clipboard, EditorError> {
        arboard::Clipboard::new()
            .map_err(|e| EditorError::Clipboard(format!("无法访问剪贴板：{}", e)))
    }
}

impl ClipboardBackend for SystemClipboard {
    fn write_png(&self, png: &PngBlob) -> Result<(), EditorError> {
        let rgba = image::load_from_memory_with_format(&png.bytes, ImageFormat::Png)
            .map_err(|e| EditorError::Clipboard(format!("PNG 数据无效：{}", e)))?
            .to_rgba8();

        let image_data = arboard::ImageData {
            width: png.width as usize,
            height: png.height as usize,
            bytes: Cow::Owned(rgba.into_raw()),
        };

        Self::open()?
            .set_image(image_data)
            .map_err(|e| EditorError::Clipboard(format!("复制失败：{}", e)))
    }

    fn read_image(&self) -> Result<Option<SourceImage>, EditorError> {
        let data = match Self::open()?.get_image() {
            Ok(data) => data,
            Err(arboard::Error::ContentNotAvailable) => return Ok(None),
            Err(e) => {
                return Err(EditorError::Clipboard(format!("读取剪贴板图片失败：{}", e)));
            }
        };

        let width = u32::try_from(data.width)
            .map_err(|_| EditorError::ResourceLimit("剪贴板图片宽度溢出".to_string()))?;
        let height = u32::try_from(data.height)
            .map_err(|_| EditorError::ResourceLimit("剪贴板图片高度溢出".to_string()))?;

        SourceImage::from_raw_rgba(width, height, data.bytes.into_owned()).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{compositor, GradientOverlay};
    use image::{Rgba, RgbaImage};

    #[test]
    #[ignore = "requires system clipboard access"]
    fn write_then_read_roundtrips_through_system_clipboard() {
        let source = SourceImage::from_rgba(RgbaImage::from_pixel(16, 8, Rgba([10, 200, 30, 255])))
            .expect("valid source image");
        let png = compositor::composite(&source, &GradientOverlay::default())
            .expect("composite")
            .encode_png()
            .expect("encode");

        let clipboard = SystemClipboard;
        clipboard.write_png(&png).expect("clipboard write should succeed");

        let read_back = clipboard
            .read_image()
            .expect("clipboard read should succeed")
            .expect("clipboard should hold an image");
        assert_eq!((read_back.width(), read_back.height()), (16, 8));
    }
}
