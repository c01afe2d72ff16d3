//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，所有 `#[tauri::command]` 函数统一返回
//! `Result<T, AppError>`，前端通过 `Serialize` 获得可读的错误信息。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `EditorError` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，满足 Tauri IPC 要求。

use serde::Serialize;

use crate::editor::EditorError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 编辑器链路错误（解码 / 合成 / 导出）
    #[error("{0}")]
    Editor(#[from] EditorError),
}

/// Tauri IPC 要求返回值实现 `Serialize`。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_error_serializes_as_message() {
        let err = AppError::from(EditorError::NothingToExport);
        let json = serde_json::to_string(&err).expect("serialize error");
        assert_eq!(json, "\"尚未粘贴图片，无法导出\"");
    }
}
