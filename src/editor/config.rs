//! # 配置模块
//!
//! ## 设计思路
//!
//! 把编辑器的默认参数与资源上限集中到 `EditorConfig`，
//! 生产环境使用 `Default`，测试或嵌入场景通过 `with_config` 注入。
//!
//! 资源上限只作用于解码阶段：超限的粘贴与解码失败一样，静默忽略。

use super::{EditorError, GradientColor, Opacity};

/// 编辑器配置。
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// 首次启动时的渐变颜色。
    pub default_gradient_color: GradientColor,
    /// 首次启动时的不透明度。
    pub default_opacity: Opacity,
    /// 单个粘贴条目允许的最大字节数。
    pub max_paste_bytes: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_gradient_color: GradientColor::BLACK,
            default_opacity: Opacity::DEFAULT,
            max_paste_bytes: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
        }
    }
}

impl EditorConfig {
    /// 校验阈值组合是否合理。
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.max_paste_bytes < 1024 {
            return Err(EditorError::InvalidFormat("max_paste_bytes 不能小于 1KB".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(EditorError::InvalidFormat("max_decoded_pixels 必须大于 0".to_string()));
        }
        if self.max_decoded_bytes < 4 {
            return Err(EditorError::InvalidFormat("max_decoded_bytes 至少容纳一个像素".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_gradient_color.to_hex(), "#000000");
        assert_eq!(config.default_opacity.percent(), 50);
    }

    #[test]
    fn validate_rejects_zero_pixel_budget() {
        let config = EditorConfig {
            max_decoded_pixels: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(config.validate(), Err(EditorError::InvalidFormat(_))));
    }

    #[test]
    fn validate_rejects_tiny_paste_budget() {
        let config = EditorConfig {
            max_paste_bytes: 10,
            ..EditorConfig::default()
        };
        assert!(matches!(config.validate(), Err(EditorError::InvalidFormat(_))));
    }
}
