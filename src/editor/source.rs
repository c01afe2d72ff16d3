//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“剪贴板输入”和“绘制用位图”解耦：
//! - `RawImageData` 表示已选中但未解码的粘贴条目
//! - `SourceImage` 表示已解码、可直接绘制的位图（预乘 alpha）
//! - `PngBlob` 表示导出阶段的 PNG 二进制
//!
//! `SourceImage` 创建后不可变，新的粘贴只会整体替换它。

use image::RgbaImage;
use tiny_skia::{ColorU8, IntSize, Pixmap, PixmapRef};

use super::EditorError;

/// 粘贴阶段输出：待解码的原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 条目声明的媒体类型（用于日志与诊断）。
    pub(crate) media_type: String,
}

/// 已解码的源图片。
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixmap: Pixmap,
}

impl SourceImage {
    /// 从非预乘 RGBA 位图构建。
    ///
    /// # 示例
    /// ```rust
    /// use gradient_paste::editor::SourceImage;
    /// use image::{Rgba, RgbaImage};
    ///
    /// let image = SourceImage::from_rgba(RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255])))?;
    /// assert_eq!((image.width(), image.height()), (4, 2));
    /// # Ok::<(), gradient_paste::editor::EditorError>(())
    /// ```
    pub fn from_rgba(rgba: RgbaImage) -> Result<Self, EditorError> {
        let (width, height) = rgba.dimensions();
        let size = IntSize::from_wh(width, height)
            .ok_or_else(|| EditorError::Decode(format!("图片尺寸无效：{}x{}", width, height)))?;

        let mut data = rgba.into_raw();
        for px in data.chunks_exact_mut(4) {
            let color = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            px.copy_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }

        let pixmap = Pixmap::from_vec(data, size)
            .ok_or_else(|| EditorError::Decode("像素数据长度与尺寸不一致".to_string()))?;

        Ok(Self { pixmap })
    }

    /// 从剪贴板原始 RGBA 字节构建（arboard 读取路径）。
    pub fn from_raw_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, EditorError> {
        let rgba = RgbaImage::from_raw(width, height, bytes)
            .ok_or_else(|| EditorError::Decode("剪贴板像素数据长度异常".to_string()))?;
        Self::from_rgba(rgba)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub(crate) fn pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }
}

/// 导出阶段输出：PNG 字节与尺寸。
#[derive(Debug, Clone)]
pub struct PngBlob {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl PngBlob {
    /// 剪贴板条目类型。
    pub const MEDIA_TYPE: &'static str = "image/png";
}
