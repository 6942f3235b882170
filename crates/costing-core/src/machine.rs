//! 機台模型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 機台類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineCategory {
    /// 傳統機台
    #[serde(rename = "conventional")]
    Conventional,
    /// 三軸 CNC
    #[serde(rename = "cnc_3axis")]
    Cnc3Axis,
    /// 五軸 CNC
    #[serde(rename = "cnc_5axis")]
    Cnc5Axis,
    /// 專用機 (Special Purpose Machine)
    #[serde(rename = "spm")]
    Spm,
}

impl MachineCategory {
    /// 依機台顯示名稱判定類別（不分大小寫的關鍵字比對）
    pub fn from_machine_name(name: &str) -> Self {
        let lower = name.to_lowercase();

        if lower.contains("cnc") || lower.contains("precision") {
            if lower.contains('5') || lower.contains("five") {
                Self::Cnc5Axis
            } else {
                Self::Cnc3Axis
            }
        } else if lower.contains("spm") || lower.contains("special") {
            Self::Spm
        } else {
            Self::Conventional
        }
    }

    /// 方法論費率表使用的類別分組
    pub fn bucket(&self) -> CategoryBucket {
        match self {
            Self::Conventional => CategoryBucket::Conventional,
            Self::Cnc3Axis | Self::Cnc5Axis => CategoryBucket::Cnc,
            Self::Spm => CategoryBucket::Spm,
        }
    }

    pub fn is_conventional(&self) -> bool {
        *self == Self::Conventional
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conventional => "conventional",
            Self::Cnc3Axis => "cnc_3axis",
            Self::Cnc5Axis => "cnc_5axis",
            Self::Spm => "spm",
        }
    }
}

impl fmt::Display for MachineCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conventional" => Ok(Self::Conventional),
            "cnc_3axis" => Ok(Self::Cnc3Axis),
            "cnc_5axis" => Ok(Self::Cnc5Axis),
            "spm" => Ok(Self::Spm),
            other => Err(format!("未知的機台類別: {other}")),
        }
    }
}

/// 費率表分組
///
/// 方法論表只區分傳統與 CNC；專用機若無專屬列，查表時併入傳統組。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryBucket {
    Conventional,
    Cnc,
    Spm,
}

/// 參考資料中的機台記錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRecord {
    /// 機台ID
    pub id: i64,

    /// 顯示名稱
    pub name: String,

    /// 類別提示（若參考資料有維護）
    pub category_hint: Option<MachineCategory>,

    /// 所屬工序ID
    pub operation_type_id: Option<i64>,
}

impl MachineRecord {
    /// 創建新的機台記錄
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category_hint: None,
            operation_type_id: None,
        }
    }

    /// 建構器模式：設置類別提示
    pub fn with_category_hint(mut self, category: MachineCategory) -> Self {
        self.category_hint = Some(category);
        self
    }

    /// 建構器模式：設置所屬工序
    pub fn with_operation_type_id(mut self, operation_type_id: i64) -> Self {
        self.operation_type_id = Some(operation_type_id);
        self
    }
}
