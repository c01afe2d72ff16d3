//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `EditorHandler` 负责流程编排，不直接与 Tauri 绑定：
//! 1. 粘贴：选条目 → 提取字节 → 阻塞线程解码 → 替换源图片 → 重绘 → 通知
//! 2. 调参：更新颜色 / 透明度 → 重绘 → 通知
//! 3. 导出：读取当前画布 → 阻塞线程编码 PNG 并写入剪贴板
//!
//! ## 实现思路
//!
//! - 会话状态放在 `Arc<Mutex<EditorSession>>` 中，由各入口独占写入。
//! - 多次粘贴的解码互不等待，谁最后完成谁生效，不做取消与排序。
//! - 预览 PNG 在释放锁之后编码，避免长时间占用会话锁。
//! - 推送按 `revision` 串行：编码完成后再持有推送锁比较版本号，
//!   比已推送版本旧的快照直接丢弃，前端看到的画面始终是最新的会话状态。
//! - 剪贴板与画面通知都通过 trait 注入，测试可替换为内存实现。

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;

use super::clipboard_writer::ClipboardBackend;
use super::compositor::CompositeSurface;
use super::ingest::{self, ClipboardItem};
use super::session::{EditorSession, EditorView};
use super::{pipeline, EditorConfig, EditorError, GradientColor, Opacity, PngBlob, SourceImage};

/// 画面快照：重绘后推送给前端的内容。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceSnapshot {
    #[serde(flatten)]
    pub view: EditorView,
    /// 合成结果的 PNG Data URL。
    pub data_url: String,
}

/// 画面更新的接收方。
pub trait SurfaceObserver: Send + Sync {
    fn surface_updated(&self, snapshot: SurfaceSnapshot);
}

/// 一次粘贴的处理结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// 没有图片条目，状态不变。
    NoImageItem,
    /// 图片条目没有可用内容，状态不变。
    NoImageData,
    /// 解码失败，状态不变。
    DecodeFailed,
    /// 已替换源图片。
    Loaded { width: u32, height: u32 },
}

/// 编辑器处理器。
#[derive(Clone)]
pub struct EditorHandler {
    config: Arc<EditorConfig>,
    session: Arc<Mutex<EditorSession>>,
    clipboard: Arc<dyn ClipboardBackend>,
    observer: Arc<dyn SurfaceObserver>,
    /// 最近一次推送的会话版本。
    published_revision: Arc<Mutex<u64>>,
}

impl EditorHandler {
    /// 根据配置、剪贴板后端与画面接收方创建处理器。
    pub fn new(
        config: EditorConfig,
        clipboard: Arc<dyn ClipboardBackend>,
        observer: Arc<dyn SurfaceObserver>,
    ) -> Result<Self, EditorError> {
        config.validate()?;
        let session = EditorSession::new(&config);

        Ok(Self {
            config: Arc::new(config),
            session: Arc::new(Mutex::new(session)),
            clipboard,
            observer,
            published_revision: Arc::new(Mutex::new(0)),
        })
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, EditorSession>, EditorError> {
        self.session.lock().map_err(|_| EditorError::StatePoisoned)
    }

    /// 当前状态视图。
    pub fn view(&self) -> Result<EditorView, EditorError> {
        Ok(self.lock_session()?.view())
    }

    /// 处理一次粘贴事件。
    ///
    /// # 示例
    /// ```rust,ignore
    /// let outcome = handler
    ///     .ingest_paste(vec![ClipboardItem::new("image/png", png_bytes)])
    ///     .await;
    /// assert!(matches!(outcome, PasteOutcome::Loaded { .. }));
    /// ```
    pub async fn ingest_paste(&self, items: Vec<ClipboardItem>) -> PasteOutcome {
        log::debug!("📥 收到粘贴事件 - 条目数: {}", items.len());

        let Some(item) = ingest::select_image_item(items) else {
            log::debug!("⏭️ 粘贴内容不含图片，忽略");
            return PasteOutcome::NoImageItem;
        };

        let raw = match ingest::extract_image_bytes(item, self.config.max_paste_bytes) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("⏭️ 图片条目没有可读取的内容，忽略");
                return PasteOutcome::NoImageData;
            }
            Err(err) => {
                log::warn!("⚠️ 读取粘贴图片失败：{}", err);
                return PasteOutcome::DecodeFailed;
            }
        };

        let config = Arc::clone(&self.config);
        let decoded = tokio::task::spawn_blocking(move || pipeline::decode_source_image(raw, &config))
            .await
            .map_err(|e| EditorError::Decode(format!("解码线程执行失败：{}", e)))
            .and_then(|result| result);

        match decoded {
            Ok(image) => self.load_source(image),
            Err(err) => {
                log::warn!("⚠️ 粘贴图片解码失败，保持当前状态：{}", err);
                PasteOutcome::DecodeFailed
            }
        }
    }

    /// 直接读取系统剪贴板中的图片。
    pub async fn paste_from_system_clipboard(&self) -> PasteOutcome {
        let clipboard = Arc::clone(&self.clipboard);
        let read = tokio::task::spawn_blocking(move || clipboard.read_image())
            .await
            .map_err(|e| EditorError::Clipboard(format!("读取线程执行失败：{}", e)))
            .and_then(|result| result);

        match read {
            Ok(Some(image)) => self.load_source(image),
            Ok(None) => {
                log::debug!("⏭️ 系统剪贴板没有图片，忽略");
                PasteOutcome::NoImageItem
            }
            Err(err) => {
                log::warn!("⚠️ 读取系统剪贴板失败，保持当前状态：{}", err);
                PasteOutcome::DecodeFailed
            }
        }
    }

    fn load_source(&self, image: SourceImage) -> PasteOutcome {
        let (width, height) = (image.width(), image.height());
        match self.replace_source(image) {
            Ok(_) => PasteOutcome::Loaded { width, height },
            Err(err) => {
                log::warn!("⚠️ 替换源图片失败：{}", err);
                PasteOutcome::DecodeFailed
            }
        }
    }

    /// 整体替换源图片并重绘。
    pub fn replace_source(&self, image: SourceImage) -> Result<EditorView, EditorError> {
        self.mutate(|session| session.set_source_image(Arc::new(image)))
    }

    pub fn set_gradient_color(&self, color: GradientColor) -> Result<EditorView, EditorError> {
        self.mutate(|session| session.set_gradient_color(color))
    }

    pub fn set_opacity(&self, opacity: Opacity) -> Result<EditorView, EditorError> {
        self.mutate(|session| session.set_opacity(opacity))
    }

    /// 修改会话后，若画布有效则推送快照。
    fn mutate(
        &self,
        op: impl FnOnce(&mut EditorSession) -> Result<(), EditorError>,
    ) -> Result<EditorView, EditorError> {
        let start = Instant::now();
        let (view, surface) = {
            let mut session = self.lock_session()?;
            op(&mut session)?;
            (session.view(), session.surface().cloned())
        };

        if let Some(surface) = surface {
            self.publish(view.clone(), &surface);
            log::debug!("🔁 重绘并推送完成 - 耗时: {}ms", start.elapsed().as_millis());
        }

        Ok(view)
    }

    fn publish(&self, view: EditorView, surface: &CompositeSurface) {
        let png = match surface.encode_png() {
            Ok(png) => png,
            Err(err) => {
                log::warn!("⚠️ 预览编码失败：{}", err);
                return;
            }
        };
        let data_url = format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(&png.bytes)
        );

        let Ok(mut published) = self.published_revision.lock() else {
            log::warn!("⚠️ 推送锁已损坏，跳过画面更新");
            return;
        };
        if view.revision <= *published {
            log::debug!(
                "⏭️ 丢弃过期画面 - revision {} (已推送 {})",
                view.revision,
                *published
            );
            return;
        }
        *published = view.revision;
        self.observer.surface_updated(SurfaceSnapshot { view, data_url });
    }

    /// 将当前画布以 PNG 写入系统剪贴板。
    ///
    /// 尚未粘贴图片时返回 `EditorError::NothingToExport`。
    pub async fn export_to_clipboard(&self) -> Result<(), EditorError> {
        let surface = self
            .lock_session()?
            .surface()
            .cloned()
            .ok_or(EditorError::NothingToExport)?;

        let clipboard = Arc::clone(&self.clipboard);
        let start = Instant::now();

        tokio::task::spawn_blocking(move || {
            let png = surface.encode_png()?;
            log::debug!(
                "📋 准备复制到剪贴板 - {} {}x{} {}KB",
                PngBlob::MEDIA_TYPE,
                png.width,
                png.height,
                png.bytes.len() / 1024
            );
            clipboard.write_png(&png)
        })
        .await
        .map_err(|e| EditorError::Clipboard(format!("线程执行失败：{}", e)))??;

        log::info!("✅ 已复制合成图片 - 耗时: {}ms", start.elapsed().as_millis());
        Ok(())
    }
}
