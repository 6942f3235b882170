//! 零件幾何模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 固定精度的圓周率，確保結果可重現
pub fn fixed_pi() -> Decimal {
    Decimal::new(314159, 5)
}

/// 零件外形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// 圓棒（直徑 + 長度）
    Round,
    /// 方料（長 + 寬 + 高）
    Rectangular,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Round => f.write_str("round"),
            Self::Rectangular => f.write_str("rectangular"),
        }
    }
}

/// 原始尺寸輸入（mm），尚未依工序驗證
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// 直徑（圓棒）
    pub diameter: Option<Decimal>,

    /// 長度（必填）
    pub length: Decimal,

    /// 寬度（方料）
    pub breadth: Option<Decimal>,

    /// 高度（方料）
    pub height: Option<Decimal>,
}

impl Dimensions {
    /// 只有長度的尺寸組
    pub fn new(length: Decimal) -> Self {
        Self {
            diameter: None,
            length,
            breadth: None,
            height: None,
        }
    }

    /// 圓棒尺寸
    pub fn round(diameter: Decimal, length: Decimal) -> Self {
        Self::new(length).with_diameter(diameter)
    }

    /// 方料尺寸
    pub fn rectangular(length: Decimal, breadth: Decimal, height: Decimal) -> Self {
        Self::new(length).with_breadth(breadth).with_height(height)
    }

    /// 建構器模式：設置直徑
    pub fn with_diameter(mut self, diameter: Decimal) -> Self {
        self.diameter = Some(diameter);
        self
    }

    /// 建構器模式：設置寬度
    pub fn with_breadth(mut self, breadth: Decimal) -> Self {
        self.breadth = Some(breadth);
        self
    }

    /// 建構器模式：設置高度
    pub fn with_height(mut self, height: Decimal) -> Self {
        self.height = Some(height);
        self
    }
}

/// 已驗證的幾何規格，恰好一組尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum GeometrySpec {
    Round {
        diameter: Decimal,
        length: Decimal,
    },
    Rectangular {
        length: Decimal,
        breadth: Decimal,
        height: Decimal,
    },
}

impl GeometrySpec {
    pub fn shape(&self) -> Shape {
        match self {
            Self::Round { .. } => Shape::Round,
            Self::Rectangular { .. } => Shape::Rectangular,
        }
    }

    /// 體積 (mm³)；超出 Decimal 可表示範圍時為 None
    ///
    /// 圓棒：π·(d/2)²·L；方料：L·B·H
    pub fn volume_mm3(&self) -> Option<Decimal> {
        match *self {
            Self::Round { diameter, length } => {
                let radius = diameter / Decimal::TWO;
                fixed_pi()
                    .checked_mul(radius)?
                    .checked_mul(radius)?
                    .checked_mul(length)
            }
            Self::Rectangular {
                length,
                breadth,
                height,
            } => length.checked_mul(breadth)?.checked_mul(height),
        }
    }

    /// 此外形的尺寸欄位名稱
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::Round { .. } => &["diameter", "length"],
            Self::Rectangular { .. } => &["length", "breadth", "height"],
        }
    }

    /// 轉回原始尺寸組
    pub fn to_dimensions(&self) -> Dimensions {
        match *self {
            Self::Round { diameter, length } => Dimensions::round(diameter, length),
            Self::Rectangular {
                length,
                breadth,
                height,
            } => Dimensions::rectangular(length, breadth, height),
        }
    }
}
