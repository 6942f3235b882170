//! 材料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// 材料
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Material {
    Aluminium,
    Steel,
    Titanium,
    Copper,
    Brass,
    /// 未列入表格的材料（保留原始名稱，小寫）
    Other(String),
}

impl Material {
    /// 密度 (g/cm³)，未知材料以鋼材計
    pub fn density_g_cm3(&self) -> Decimal {
        match self {
            Self::Aluminium => Decimal::new(270, 2),
            Self::Steel => Decimal::new(785, 2),
            Self::Titanium => Decimal::new(451, 2),
            Self::Copper => Decimal::new(896, 2),
            Self::Brass => Decimal::new(850, 2),
            Self::Other(_) => Decimal::new(785, 2),
        }
    }

    /// 體積評分法的材料係數
    pub fn duty_factor(&self) -> Decimal {
        match self {
            Self::Steel => Decimal::new(30, 1),
            Self::Titanium => Decimal::new(17, 1),
            _ => Decimal::ONE,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Aluminium => "aluminium",
            Self::Steel => "steel",
            Self::Titanium => "titanium",
            Self::Copper => "copper",
            Self::Brass => "brass",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Ok(match key.as_str() {
            "aluminium" => Self::Aluminium,
            "steel" => Self::Steel,
            "titanium" => Self::Titanium,
            "copper" => Self::Copper,
            "brass" => Self::Brass,
            _ => Self::Other(key),
        })
    }
}

impl From<String> for Material {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(material) => material,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Material {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Material> for String {
    fn from(value: Material) -> Self {
        value.as_str().to_string()
    }
}
