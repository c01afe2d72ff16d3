//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 编辑器链路（粘贴 → 解码 → 合成 → 导出）的所有失败来源集中在一个枚举里。
//! 按照交互约定，这些错误大多只记录日志、不弹给用户；
//! 但调用侧仍可以按分支匹配，测试也能精确断言。

/// 编辑器统一错误类型。
///
/// 在命令层被上转为 `AppError`，最终透传给前端。
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("颜色无效：{0}（应为 #rrggbb）")]
    InvalidColor(String),

    #[error("不透明度无效：{0}（范围 0~100）")]
    InvalidOpacity(u32),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("绘制错误：{0}")]
    Render(String),

    #[error("剪贴板错误：{0}")]
    Clipboard(String),

    #[error("尚未粘贴图片，无法导出")]
    NothingToExport,

    #[error("编辑器状态锁已中毒")]
    StatePoisoned,
}

impl EditorError {
    /// 稳定的错误码，供前端区分分支（日志检索也用它）。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "E_DECODE",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::InvalidColor(_) => "E_INVALID_COLOR",
            Self::InvalidOpacity(_) => "E_INVALID_OPACITY",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::Render(_) => "E_RENDER",
            Self::Clipboard(_) => "E_CLIPBOARD",
            Self::NothingToExport => "E_NOTHING_TO_EXPORT",
            Self::StatePoisoned => "E_STATE_POISONED",
        }
    }
}
