//! # 解码流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → 预乘 RGBA 位图”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做签名与尺寸检查，再进行完整解码，避免异常输入触发高内存开销。
//!
//! ## 实现思路
//!
//! 1. 体积检查
//! 2. 通过文件签名（magic bytes）确认是图片
//! 3. 读取 header 尺寸，按像素 / 内存上限快速拒绝
//! 4. 完整解码并转换为 `SourceImage`

use image::{GenericImageView, ImageReader};
use std::io::Cursor;
use std::time::Instant;

use super::source::RawImageData;
use super::{EditorConfig, EditorError, SourceImage};

/// 将粘贴条目的原始字节解码为源图片。
pub(crate) fn decode_source_image(
    raw: RawImageData,
    config: &EditorConfig,
) -> Result<SourceImage, EditorError> {
    let start = Instant::now();

    if raw.bytes.len() as u64 > config.max_paste_bytes {
        return Err(EditorError::ResourceLimit(format!(
            "粘贴内容过大：{:.2} MB（限制：{:.2} MB）",
            raw.bytes.len() as f64 / 1024.0 / 1024.0,
            config.max_paste_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    validate_image_signature(&raw.bytes)?;

    let (header_width, header_height) = inspect_dimensions_from_memory(&raw.bytes)?;
    validate_pixel_limits(config, header_width, header_height)?;
    validate_decoded_memory_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(&raw.bytes)
        .map_err(|e| EditorError::Decode(format!("图片解码失败：{}", e)))?;

    let (width, height) = decoded.dimensions();
    validate_pixel_limits(config, width, height)?;
    validate_decoded_memory_limits(config, width, height)?;

    let image = SourceImage::from_rgba(decoded.to_rgba8())?;

    log::info!(
        "✅ 图片解码成功 - 类型: {} 尺寸: {}x{} 输入: {}KB 耗时: {}ms",
        raw.media_type,
        width,
        height,
        raw.bytes.len() / 1024,
        start.elapsed().as_millis()
    );

    Ok(image)
}

/// 通过文件签名校验输入是否为图片。
fn validate_image_signature(bytes: &[u8]) -> Result<(), EditorError> {
    if bytes.is_empty() {
        return Err(EditorError::InvalidFormat("图片内容为空".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| EditorError::InvalidFormat("无法识别图片类型".to_string()))?;

    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(EditorError::InvalidFormat(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        )));
    }

    Ok(())
}

/// 仅通过图片头信息读取宽高，用于完整解码前的限额检查。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), EditorError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| EditorError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

    reader
        .into_dimensions()
        .map_err(|e| EditorError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
}

fn validate_pixel_limits(config: &EditorConfig, width: u32, height: u32) -> Result<(), EditorError> {
    let pixels = (width as u64)
        .checked_mul(height as u64)
        .ok_or_else(|| EditorError::ResourceLimit("图片像素数溢出".to_string()))?;

    if pixels > config.max_decoded_pixels {
        return Err(EditorError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    Ok(())
}

fn validate_decoded_memory_limits(
    config: &EditorConfig,
    width: u32,
    height: u32,
) -> Result<(), EditorError> {
    let estimated = (width as u64)
        .checked_mul(height as u64)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| EditorError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

    if estimated > config.max_decoded_bytes {
        return Err(EditorError::ResourceLimit(format!(
            "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
            estimated as f64 / 1024.0 / 1024.0,
            config.max_decoded_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    Ok(())
}
