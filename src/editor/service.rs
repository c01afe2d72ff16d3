//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! `EditorServiceState` 作为 Tauri 托管状态注入命令层，内部持有 `EditorHandler`。
//! Tauri 相关的两件事也集中在这里：
//! - 把重绘快照通过 `editor://surface` 事件推送给前端
//! - 在编辑器生命周期内订阅 `editor://paste` 事件，窗口销毁时取消订阅
//!
//! ## 实现思路
//!
//! 粘贴订阅使用 RAII：`PasteSubscription` 构造时注册监听，`Drop` 时注销，
//! 不会在窗口销毁后残留全局监听。

use std::sync::{Arc, Mutex};

use tauri::{AppHandle, Emitter, EventId, Listener, Runtime, Wry};

use super::clipboard_writer::{ClipboardBackend, SystemClipboard};
use super::handler::{EditorHandler, PasteOutcome, SurfaceObserver, SurfaceSnapshot};
use super::ingest::PastePayload;
use super::session::EditorView;
use super::{EditorConfig, EditorError, GradientColor, Opacity};

pub const PASTE_EVENT: &str = "editor://paste";
pub const SURFACE_EVENT: &str = "editor://surface";

/// 把快照以 Tauri 事件推送给前端。
struct TauriSurfaceEmitter<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> SurfaceObserver for TauriSurfaceEmitter<R> {
    fn surface_updated(&self, snapshot: SurfaceSnapshot) {
        if let Err(err) = self.app.emit(SURFACE_EVENT, snapshot) {
            log::warn!("发送画面更新事件失败: {}", err);
        }
    }
}

/// 粘贴事件订阅守卫，`Drop` 时注销监听。
pub struct PasteSubscription<R: Runtime = Wry> {
    app: AppHandle<R>,
    id: EventId,
}

impl<R: Runtime> PasteSubscription<R> {
    fn attach(app: &AppHandle<R>, handler: EditorHandler) -> Self {
        let id = app.listen(PASTE_EVENT, move |event| {
            let payload = match serde_json::from_str::<PastePayload>(event.payload()) {
                Ok(payload) => payload,
                Err(err) => {
                    log::debug!("⏭️ 无法解析粘贴事件负载，忽略: {}", err);
                    return;
                }
            };

            let handler = handler.clone();
            tauri::async_runtime::spawn(async move {
                let outcome = handler.ingest_paste(payload.items).await;
                log::debug!("📥 粘贴处理结束: {:?}", outcome);
            });
        });

        log::info!("📋 已订阅粘贴事件");
        Self { app: app.clone(), id }
    }
}

impl<R: Runtime> Drop for PasteSubscription<R> {
    fn drop(&mut self) {
        self.app.unlisten(self.id);
        log::info!("📋 已取消粘贴事件订阅");
    }
}

/// 编辑器服务状态。
pub struct EditorServiceState<R: Runtime = Wry> {
    handler: EditorHandler,
    subscription: Mutex<Option<PasteSubscription<R>>>,
}

impl<R: Runtime> EditorServiceState<R> {
    /// 使用默认配置与系统剪贴板创建服务状态。
    pub fn new(app: &AppHandle<R>) -> Result<Self, EditorError> {
        Self::with_config(app, EditorConfig::default(), Arc::new(SystemClipboard))
    }

    /// 使用自定义配置与剪贴板后端创建服务状态。
    pub fn with_config(
        app: &AppHandle<R>,
        config: EditorConfig,
        clipboard: Arc<dyn ClipboardBackend>,
    ) -> Result<Self, EditorError> {
        let observer = Arc::new(TauriSurfaceEmitter { app: app.clone() });
        let handler = EditorHandler::new(config, clipboard, observer)?;
        Ok(Self {
            handler,
            subscription: Mutex::new(None),
        })
    }

    /// 开始监听粘贴事件（重复调用会替换旧订阅）。
    pub fn attach_paste_listener(&self, app: &AppHandle<R>) -> Result<(), EditorError> {
        let subscription = PasteSubscription::attach(app, self.handler.clone());
        let mut guard = self.subscription.lock().map_err(|_| EditorError::StatePoisoned)?;
        *guard = Some(subscription);
        Ok(())
    }

    /// 停止监听粘贴事件。
    pub fn detach_paste_listener(&self) -> Result<(), EditorError> {
        let previous = self
            .subscription
            .lock()
            .map_err(|_| EditorError::StatePoisoned)?
            .take();
        drop(previous);
        Ok(())
    }

    pub fn view(&self) -> Result<EditorView, EditorError> {
        self.handler.view()
    }

    /// 修改渐变颜色（重绘在阻塞线程执行）。
    pub async fn set_gradient_color(&self, color: GradientColor) -> Result<EditorView, EditorError> {
        let handler = self.handler.clone();
        tokio::task::spawn_blocking(move || handler.set_gradient_color(color))
            .await
            .map_err(|e| EditorError::Render(format!("重绘线程执行失败：{}", e)))?
    }

    /// 修改不透明度（重绘在阻塞线程执行）。
    pub async fn set_opacity(&self, opacity: Opacity) -> Result<EditorView, EditorError> {
        let handler = self.handler.clone();
        tokio::task::spawn_blocking(move || handler.set_opacity(opacity))
            .await
            .map_err(|e| EditorError::Render(format!("重绘线程执行失败：{}", e)))?
    }

    pub async fn paste_from_system_clipboard(&self) -> PasteOutcome {
        self.handler.paste_from_system_clipboard().await
    }

    pub async fn export_to_clipboard(&self) -> Result<(), EditorError> {
        self.handler.export_to_clipboard().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use base64::{Engine as _, engine::general_purpose};
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use tauri::test::{MockRuntime, mock_app};

    use crate::editor::{ClipboardBackend, PngBlob, SourceImage};

    struct NullClipboard;

    impl ClipboardBackend for NullClipboard {
        fn write_png(&self, _png: &PngBlob) -> Result<(), EditorError> {
            Ok(())
        }

        fn read_image(&self) -> Result<Option<SourceImage>, EditorError> {
            Ok(None)
        }
    }

    fn paste_payload(width: u32, height: u32) -> serde_json::Value {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        let data = format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(cursor.into_inner())
        );
        serde_json::json!({ "items": [{ "mediaType": "image/png", "data": data }] })
    }

    fn service(app: &AppHandle<MockRuntime>) -> EditorServiceState<MockRuntime> {
        EditorServiceState::with_config(app, EditorConfig::default(), Arc::new(NullClipboard))
            .expect("service init failed")
    }

    fn count_surfaces(app: &AppHandle<MockRuntime>) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        app.listen(SURFACE_EVENT, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    fn wait_for(condition: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        condition()
    }

    #[test]
    fn attached_listener_loads_pasted_image() {
        let app = mock_app();
        let handle = app.handle().clone();
        let state = service(&handle);
        state.attach_paste_listener(&handle).expect("attach");

        handle.emit(PASTE_EVENT, paste_payload(6, 4)).expect("emit paste");

        assert!(wait_for(|| state.view().map(|v| v.has_image).unwrap_or(false)));
        let view = state.view().expect("view");
        assert_eq!((view.width, view.height), (Some(6), Some(4)));
    }

    #[test]
    fn detached_listener_ignores_paste() {
        let app = mock_app();
        let handle = app.handle().clone();
        let state = service(&handle);
        state.attach_paste_listener(&handle).expect("attach");
        state.detach_paste_listener().expect("detach");

        handle.emit(PASTE_EVENT, paste_payload(6, 4)).expect("emit paste");
        std::thread::sleep(Duration::from_millis(300));

        assert!(!state.view().expect("view").has_image);
    }

    #[test]
    fn reattaching_replaces_previous_subscription() {
        let app = mock_app();
        let handle = app.handle().clone();
        let surfaces = count_surfaces(&handle);
        let state = service(&handle);
        state.attach_paste_listener(&handle).expect("first attach");
        state.attach_paste_listener(&handle).expect("second attach");

        handle.emit(PASTE_EVENT, paste_payload(3, 3)).expect("emit paste");

        assert!(wait_for(|| surfaces.load(Ordering::SeqCst) >= 1));
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(surfaces.load(Ordering::SeqCst), 1);
        assert_eq!(state.view().expect("view").revision, 1);
    }
}
