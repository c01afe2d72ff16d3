//! # 渐变参数模块
//!
//! 渐变颜色（`#rrggbb`）与不透明度（0~100）是用户可调的两个参数，
//! 二者共同决定两个渐变色标：
//!
//! ```text
//! stop 0（底边）: #rrggbb + alpha
//! stop 1（顶边）: #rrggbb + 00
//! ```
//!
//! alpha 由 `round(opacity * 2.55)` 得到。这里用整数运算，
//! 保证 `.5` 恰好向上取整（50 → 128 → `80`），不受浮点误差影响。

use std::fmt;
use std::str::FromStr;

use super::EditorError;

/// 渐变颜色（不含透明度的 RGB）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GradientColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl GradientColor {
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// 解析 `#rrggbb`（`#` 可省略，大小写不敏感）。
    ///
    /// # 示例
    /// ```rust
    /// use gradient_paste::editor::GradientColor;
    ///
    /// let color = GradientColor::parse("#FF8000")?;
    /// assert_eq!(color.to_hex(), "#ff8000");
    /// # Ok::<(), gradient_paste::editor::EditorError>(())
    /// ```
    pub fn parse(input: &str) -> Result<Self, EditorError> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EditorError::InvalidColor(input.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| EditorError::InvalidColor(input.to_string()))
        };

        Ok(Self {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }

    pub fn red(self) -> u8 {
        self.red
    }

    pub fn green(self) -> u8 {
        self.green
    }

    pub fn blue(self) -> u8 {
        self.blue
    }

    /// 小写 `#rrggbb`。
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl Default for GradientColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for GradientColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for GradientColor {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for GradientColor {
    type Error = EditorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GradientColor> for String {
    fn from(color: GradientColor) -> Self {
        color.to_hex()
    }
}

/// 不透明度百分比（0~100，步长 1）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u8")]
pub struct Opacity(u8);

impl Opacity {
    pub const MAX: u8 = 100;
    pub const DEFAULT: Self = Self(50);

    pub fn new(percent: u32) -> Result<Self, EditorError> {
        if percent > u32::from(Self::MAX) {
            return Err(EditorError::InvalidOpacity(percent));
        }
        Ok(Self(percent as u8))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// 映射到 8 位 alpha：`round(percent * 2.55)`，半数向上。
    pub fn alpha(self) -> u8 {
        ((u32::from(self.0) * 255 + 50) / 100) as u8
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Opacity {
    type Error = EditorError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Opacity> for u8 {
    fn from(opacity: Opacity) -> Self {
        opacity.0
    }
}

/// 单个渐变色标：位置（0.0 底边，1.0 顶边）+ 带 alpha 的颜色。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f32,
    pub color: GradientColor,
    pub alpha: u8,
}

impl ColorStop {
    /// `#rrggbbaa`，alpha 两位小写十六进制、零填充。
    pub fn to_hex(self) -> String {
        format!("{}{:02x}", self.color.to_hex(), self.alpha)
    }
}

/// 叠加层参数：颜色 + 不透明度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GradientOverlay {
    pub color: GradientColor,
    pub opacity: Opacity,
}

impl GradientOverlay {
    pub fn new(color: GradientColor, opacity: Opacity) -> Self {
        Self { color, opacity }
    }

    /// 两个色标，方向固定：底边有色，顶边全透明。
    pub fn stops(&self) -> [ColorStop; 2] {
        [
            ColorStop {
                position: 0.0,
                color: self.color,
                alpha: self.opacity.alpha(),
            },
            ColorStop {
                position: 1.0,
                color: self.color,
                alpha: 0,
            },
        ]
    }
}
