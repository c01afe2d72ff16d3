// 防止在 Windows 发布版本中显示额外的控制台窗口，不要删除！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! # 渐变粘贴编辑器：应用入口
//!
//! 本文件仅负责应用初始化与命令注册。
//! 业务逻辑分布在 `editor` 模块中，详见 `lib.rs` 架构文档。

use gradient_paste::editor::{self, EditorServiceState};
use tauri::Manager;
use tauri::image::Image;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .setup(|app| {
            log::info!("setup: begin");
            let handle = app.handle().clone();

            let service = EditorServiceState::new(&handle)?;
            service.attach_paste_listener(&handle)?;
            app.manage(service);
            log::info!("setup: editor service managed");

            // 显式设置主窗口图标，避免平台默认图标与配置不一致
            let app_icon = Image::from_bytes(include_bytes!("../icons/icon.png"))?;
            if let Some(main_window) = app.get_webview_window("main") {
                if let Err(err) = main_window.set_icon(app_icon) {
                    log::warn!("设置主窗口图标失败: {err}");
                }
            }

            log::info!("setup: complete");
            Ok(())
        })
        // 主窗口销毁即编辑器生命周期结束，注销粘贴订阅
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Destroyed = event {
                if window.label() != "main" {
                    return;
                }
                if let Some(service) = window.app_handle().try_state::<EditorServiceState>() {
                    if let Err(err) = service.detach_paste_listener() {
                        log::warn!("注销粘贴订阅失败: {err}");
                    }
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            editor::commands::set_gradient_color,
            editor::commands::set_gradient_opacity,
            editor::commands::get_editor_state,
            editor::commands::copy_composite_to_clipboard,
            editor::commands::paste_from_system_clipboard,
        ])
        .run(tauri::generate_context!())
        .expect("运行 Tauri 应用时出错");
}
