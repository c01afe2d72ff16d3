//! # 粘贴条目解析模块
//!
//! ## 设计思路
//!
//! 一次粘贴事件可能携带多个条目（纯文本、HTML、图片……）。
//! 按顺序检查媒体类型，命中第一个图片条目后立即停止扫描；
//! 只有被选中的条目才会做 Base64 解码，其余条目不产生任何开销。
//!
//! 前端事件负载格式：
//!
//! ```text
//! { "items": [ { "mediaType": "text/plain", "data": null },
//!              { "mediaType": "image/png",  "data": "<base64 或 data URL>" } ] }
//! ```

use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;

use super::source::RawImageData;
use super::EditorError;

/// 条目内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemData {
    /// 已就绪的二进制内容。
    Bytes(Vec<u8>),
    /// 前端传来的 Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
    /// 条目不是文件（例如纯文本），拿不到二进制内容。
    Unavailable,
}

/// 剪贴板条目：媒体类型 + 内容。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "PastedItemWire")]
pub struct ClipboardItem {
    pub media_type: String,
    pub data: ItemData,
}

impl ClipboardItem {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            data: ItemData::Bytes(bytes),
        }
    }

    /// 没有二进制内容的条目（如 `text/plain`）。
    pub fn without_data(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            data: ItemData::Unavailable,
        }
    }

    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PastedItemWire {
    media_type: String,
    #[serde(default)]
    data: Option<String>,
}

impl From<PastedItemWire> for ClipboardItem {
    fn from(wire: PastedItemWire) -> Self {
        Self {
            media_type: wire.media_type,
            data: wire.data.map_or(ItemData::Unavailable, ItemData::Base64),
        }
    }
}

/// 前端粘贴事件负载。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PastePayload {
    #[serde(default)]
    pub items: Vec<ClipboardItem>,
}

/// 媒体类型是否表示图片（包含 `image`，大小写不敏感）。
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.to_ascii_lowercase().contains("image")
}

/// 选出第一个图片条目，之后的条目不再检查。
pub fn select_image_item(items: Vec<ClipboardItem>) -> Option<ClipboardItem> {
    items.into_iter().find(ClipboardItem::is_image)
}

/// 提取被选中条目的二进制内容。
///
/// 返回 `Ok(None)` 表示条目没有可用内容（静默忽略）。
pub(crate) fn extract_image_bytes(
    item: ClipboardItem,
    max_bytes: u64,
) -> Result<Option<RawImageData>, EditorError> {
    let bytes = match item.data {
        ItemData::Bytes(bytes) => bytes,
        ItemData::Base64(encoded) => parse_base64_with_limit(&encoded, max_bytes)?,
        ItemData::Unavailable => return Ok(None),
    };

    Ok(Some(RawImageData {
        bytes,
        media_type: item.media_type,
    }))
}

fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, EditorError> {
    let len = base64_data.trim().len() as u64;
    let groups = len
        .checked_add(3)
        .ok_or_else(|| EditorError::ResourceLimit("Base64 输入长度溢出".to_string()))?
        / 4;

    groups
        .checked_mul(3)
        .ok_or_else(|| EditorError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
}

fn parse_base64_with_limit(data: &str, max_bytes: u64) -> Result<Vec<u8>, EditorError> {
    let normalized = data.trim();

    let base64_data = if normalized.starts_with("data:") {
        let base64_start = normalized
            .find(";base64,")
            .ok_or_else(|| EditorError::InvalidFormat("缺少 base64 标记".to_string()))?;
        &normalized[base64_start + 8..]
    } else {
        normalized
    };

    let estimated_len = estimate_base64_decoded_upper_bound_len(base64_data)?;
    if estimated_len > max_bytes {
        return Err(EditorError::ResourceLimit(format!(
            "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
            estimated_len as f64 / 1024.0 / 1024.0,
            max_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    general_purpose::STANDARD
        .decode(base64_data)
        .map_err(|e| EditorError::Decode(format!("Base64 解码失败：{}", e)))
}
