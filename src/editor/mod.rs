//! # 图片编辑器模块（editor）
//!
//! ## 设计思路
//!
//! 整个应用就是一个编辑器组件：粘贴图片 → 叠加纵向线性渐变 → 预览 → 复制为 PNG。
//! 按职责拆分为多个子模块：
//!
//! - `commands`：仅做 IPC 入参/出参适配（薄封装）
//! - `service`：Tauri 托管状态、事件推送与粘贴订阅
//! - `handler`：编排粘贴 / 调参 / 导出流程
//! - `session`：三个可观测字段 + 显式重绘
//! - `ingest`：粘贴条目选择与 Base64 提取
//! - `pipeline`：签名校验、尺寸限额、解码
//! - `compositor`：绘制源图片与渐变叠加层
//! - `clipboard_writer`：系统剪贴板读写
//! - `config/error/gradient/source`：配置、错误、参数与中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! 前端 paste 事件 ──emit("editor://paste")──> service.rs（订阅）
//!                                               ↓
//!                                      handler.rs（编排）
//!                                 ├─ ingest.rs（选条目）
//!                                 ├─ pipeline.rs（解码）
//!                                 └─ session.rs → compositor.rs（重绘）
//!                                               ↓
//!                              emit("editor://surface") ──> 前端画布
//!
//! 前端按钮 ──invoke──> commands.rs → service.rs → handler.rs → clipboard_writer.rs
//! ```

pub mod commands;
mod clipboard_writer;
mod compositor;
mod config;
mod error;
mod gradient;
mod handler;
mod ingest;
mod pipeline;
mod service;
mod session;
mod source;

pub use clipboard_writer::{ClipboardBackend, SystemClipboard};
pub use commands::{
    copy_composite_to_clipboard,
    get_editor_state,
    paste_from_system_clipboard,
    set_gradient_color,
    set_gradient_opacity,
};
pub use compositor::{composite, CompositeSurface};
pub use config::EditorConfig;
pub use error::EditorError;
pub use gradient::{ColorStop, GradientColor, GradientOverlay, Opacity};
pub use handler::{EditorHandler, PasteOutcome, SurfaceObserver, SurfaceSnapshot};
pub use ingest::{is_image_media_type, select_image_item, ClipboardItem, ItemData, PastePayload};
pub use service::{EditorServiceState, PasteSubscription, PASTE_EVENT, SURFACE_EVENT};
pub use session::{EditorSession, EditorView};
pub use source::{PngBlob, SourceImage};
