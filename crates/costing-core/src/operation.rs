//! 工序模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 加工工序
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operation {
    Turning,
    Milling,
    Drilling,
    Grinding,
    Boring,
    HeatTreatment,
    Welding,
    SurfaceTreatment,
    /// 其他工序（保留正規化後的名稱）
    Other(String),
}

impl Operation {
    /// 體積評分法的工序係數
    pub fn duty_factor(&self) -> Decimal {
        match self {
            Self::Turning => Decimal::ONE,
            Self::Milling => Decimal::new(15, 1),
            Self::Drilling => Decimal::new(8, 1),
            Self::Grinding => Decimal::new(12, 1),
            Self::Boring => Decimal::new(13, 1),
            Self::HeatTreatment => Decimal::new(20, 1),
            Self::Welding => Decimal::new(18, 1),
            Self::SurfaceTreatment => Decimal::ONE,
            Self::Other(_) => Decimal::ONE,
        }
    }

    /// 車削類工序（依材料分段判定負荷）
    pub fn is_turning_family(&self) -> bool {
        matches!(self, Self::Turning | Self::Boring)
    }

    /// 本身負荷較重、判定後需再提升一級的工序
    pub fn is_demanding(&self) -> bool {
        matches!(self, Self::HeatTreatment | Self::Welding)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Turning => "turning",
            Self::Milling => "milling",
            Self::Drilling => "drilling",
            Self::Grinding => "grinding",
            Self::Boring => "boring",
            Self::HeatTreatment => "heat_treatment",
            Self::Welding => "welding",
            Self::SurfaceTreatment => "surface_treatment",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Operation {
    /// 大小寫、空白、底線與連字號不敏感："Heat Treatment" == "heat_treatment"
    fn from(value: &str) -> Self {
        let key = crate::reference::normalize_name(value).replace(' ', "_");
        match key.as_str() {
            "turning" => Self::Turning,
            "milling" => Self::Milling,
            "drilling" => Self::Drilling,
            "grinding" => Self::Grinding,
            "boring" => Self::Boring,
            "heat_treatment" => Self::HeatTreatment,
            "welding" => Self::Welding,
            "surface_treatment" => Self::SurfaceTreatment,
            _ => Self::Other(key),
        }
    }
}

impl From<String> for Operation {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Operation> for String {
    fn from(value: Operation) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("turning", Operation::Turning)]
    #[case(" Milling ", Operation::Milling)]
    #[case("Heat Treatment", Operation::HeatTreatment)]
    #[case("surface-treatment", Operation::SurfaceTreatment)]
    #[case("WELDING", Operation::Welding)]
    fn test_parse(#[case] input: &str, #[case] expected: Operation) {
        assert_eq!(Operation::from(input), expected);
    }

    #[test]
    fn test_unknown_operation_keeps_name() {
        let op = Operation::from("Laser Cutting");
        assert_eq!(op, Operation::Other("laser_cutting".to_string()));
        assert_eq!(op.duty_factor(), Decimal::ONE);
    }

    #[test]
    fn test_families() {
        assert!(Operation::Boring.is_turning_family());
        assert!(!Operation::Drilling.is_turning_family());
        assert!(Operation::Welding.is_demanding());
        assert!(!Operation::Grinding.is_demanding());
    }
}
