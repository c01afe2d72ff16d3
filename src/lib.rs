//! # 渐变粘贴编辑器：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  前端 (ui/ 静态页面)                      │
//! │                                                          │
//! │  颜色选择器 ── 不透明度滑块 ── 画布 ── 复制按钮          │
//! │       │ invoke            ↑ listen("editor://surface")   │
//! │       │ emit("editor://paste")                           │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Tauri IPC (Result<T, AppError>)
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  └─ editor ───── 粘贴 · 解码 · 渐变合成 · 复制 PNG        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，所有 Tauri command 的返回类型 |
//! | [`editor`] | 粘贴订阅、图片解码、渐变合成、剪贴板导出 |

pub mod error;
pub mod editor;
