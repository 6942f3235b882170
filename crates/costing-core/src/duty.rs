//! 負荷等級模型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 負荷等級（有序：Light < Medium < Heavy）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DutyCategory {
    /// 輕負荷
    Light,
    /// 中負荷
    Medium,
    /// 重負荷
    Heavy,
}

impl DutyCategory {
    /// 所有等級（由輕到重）
    pub const ALL: [DutyCategory; 3] = [Self::Light, Self::Medium, Self::Heavy];

    /// 提升一級，Heavy 封頂
    pub fn next(self) -> Self {
        match self {
            Self::Light => Self::Medium,
            Self::Medium | Self::Heavy => Self::Heavy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}

impl fmt::Display for DutyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DutyCategory {
    type Err = String;

    /// 接受 "Medium duty"、"heavy-duty" 等寫法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::reference::normalize_name(s).as_str() {
            "light" => Ok(Self::Light),
            "medium" => Ok(Self::Medium),
            "heavy" => Ok(Self::Heavy),
            _ => Err(format!("未知的負荷等級: {s}")),
        }
    }
}
