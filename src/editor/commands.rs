//! # Tauri 命令层
//!
//! 命令层仅做 IPC 参数接收与结果返回，不承载业务逻辑。
//! 所有实际处理交由 `EditorServiceState`。

use super::handler::PasteOutcome;
use super::service::EditorServiceState;
use super::session::EditorView;
use super::{GradientColor, Opacity};
use crate::error::AppError;
use tauri::State;

/// 修改渐变颜色（`#rrggbb`）。
#[tauri::command]
pub async fn set_gradient_color(
    state: State<'_, EditorServiceState>,
    color: String,
) -> Result<EditorView, AppError> {
    let color = GradientColor::parse(&color)?;
    Ok(state.set_gradient_color(color).await?)
}

/// 修改不透明度（0~100）。
#[tauri::command]
pub async fn set_gradient_opacity(
    state: State<'_, EditorServiceState>,
    opacity: u32,
) -> Result<EditorView, AppError> {
    let opacity = Opacity::new(opacity)?;
    Ok(state.set_opacity(opacity).await?)
}

/// 查询当前编辑器状态。
#[tauri::command]
pub fn get_editor_state(state: State<'_, EditorServiceState>) -> Result<EditorView, AppError> {
    Ok(state.view()?)
}

/// 把合成结果复制到系统剪贴板。
#[tauri::command]
pub async fn copy_composite_to_clipboard(
    state: State<'_, EditorServiceState>,
) -> Result<(), AppError> {
    state.export_to_clipboard().await.map_err(|err| {
        log::warn!("复制合成图片失败: code={} {}", err.code(), err);
        AppError::from(err)
    })
}

/// 从系统剪贴板读取图片作为源图片。
///
/// 返回是否成功载入。
#[tauri::command]
pub async fn paste_from_system_clipboard(
    state: State<'_, EditorServiceState>,
) -> Result<bool, AppError> {
    let outcome = state.paste_from_system_clipboard().await;
    Ok(matches!(outcome, PasteOutcome::Loaded { .. }))
}
