//! 幾何解析：依工序驗證尺寸組並計算體積

use costing_core::{CostError, Dimensions, GeometrySpec, Operation, Shape};
use rust_decimal::Decimal;

/// 工序對尺寸組的要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionRule {
    /// 必須為圓棒（直徑 + 長度）
    RoundOnly,
    /// 必須為方料（長 + 寬 + 高）
    RectangularOnly,
    /// 兩者擇一
    Either,
}

impl DimensionRule {
    /// 工序 → 尺寸規則
    pub fn for_operation(operation: &Operation) -> Self {
        match operation {
            Operation::Turning | Operation::Boring => Self::RoundOnly,
            Operation::Milling | Operation::Grinding | Operation::SurfaceTreatment => {
                Self::RectangularOnly
            }
            _ => Self::Either,
        }
    }
}

/// 解析結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGeometry {
    pub geometry: GeometrySpec,
    pub shape: Shape,
    /// 體積 (mm³)，未捨入
    pub volume_mm3: Decimal,
}

/// 幾何解析器
pub struct GeometryResolver;

impl GeometryResolver {
    /// 驗證尺寸組並推導外形與體積
    pub fn resolve(
        operation: &Operation,
        dimensions: &Dimensions,
    ) -> costing_core::Result<ResolvedGeometry> {
        Self::check_positive(operation, dimensions)?;

        let geometry = match DimensionRule::for_operation(operation) {
            DimensionRule::RoundOnly => Self::resolve_round_only(operation, dimensions)?,
            DimensionRule::RectangularOnly => {
                Self::resolve_rectangular_only(operation, dimensions)?
            }
            DimensionRule::Either => Self::resolve_either(operation, dimensions)?,
        };

        let Some(volume_mm3) = geometry.volume_mm3() else {
            return Err(CostError::validation(
                operation.as_str(),
                geometry.field_names(),
                "尺寸過大，體積超出可計算範圍",
            ));
        };

        Ok(ResolvedGeometry {
            geometry,
            shape: geometry.shape(),
            volume_mm3,
        })
    }

    fn check_positive(operation: &Operation, dimensions: &Dimensions) -> costing_core::Result<()> {
        let supplied = [
            ("diameter", dimensions.diameter),
            ("length", Some(dimensions.length)),
            ("breadth", dimensions.breadth),
            ("height", dimensions.height),
        ];

        let offending: Vec<&str> = supplied
            .iter()
            .filter(|(_, value)| matches!(value, Some(v) if *v <= Decimal::ZERO))
            .map(|(name, _)| *name)
            .collect();

        if offending.is_empty() {
            Ok(())
        } else {
            Err(CostError::validation(
                operation.as_str(),
                &offending,
                "尺寸必須大於 0 mm",
            ))
        }
    }

    fn resolve_round_only(
        operation: &Operation,
        dimensions: &Dimensions,
    ) -> costing_core::Result<GeometrySpec> {
        let Some(diameter) = dimensions.diameter else {
            return Err(CostError::validation(
                operation.as_str(),
                &["diameter"],
                "必須提供 'diameter' 與 'length'（圓棒）",
            ));
        };

        let mut forbidden = Vec::new();
        if dimensions.breadth.is_some() {
            forbidden.push("breadth");
        }
        if dimensions.height.is_some() {
            forbidden.push("height");
        }
        if !forbidden.is_empty() {
            return Err(CostError::validation(
                operation.as_str(),
                &forbidden,
                "只接受 'diameter' 與 'length'（圓棒）",
            ));
        }

        Ok(GeometrySpec::Round {
            diameter,
            length: dimensions.length,
        })
    }

    fn resolve_rectangular_only(
        operation: &Operation,
        dimensions: &Dimensions,
    ) -> costing_core::Result<GeometrySpec> {
        let mut missing = Vec::new();
        if dimensions.breadth.is_none() {
            missing.push("breadth");
        }
        if dimensions.height.is_none() {
            missing.push("height");
        }
        if !missing.is_empty() {
            return Err(CostError::validation(
                operation.as_str(),
                &missing,
                "必須提供 'length'、'breadth' 與 'height'（方料）",
            ));
        }

        if dimensions.diameter.is_some() {
            return Err(CostError::validation(
                operation.as_str(),
                &["diameter"],
                "只接受 'length'、'breadth' 與 'height'（方料）",
            ));
        }

        match (dimensions.breadth, dimensions.height) {
            (Some(breadth), Some(height)) => Ok(GeometrySpec::Rectangular {
                length: dimensions.length,
                breadth,
                height,
            }),
            _ => Err(CostError::validation(
                operation.as_str(),
                &["breadth", "height"],
                "必須提供 'length'、'breadth' 與 'height'（方料）",
            )),
        }
    }

    fn resolve_either(
        operation: &Operation,
        dimensions: &Dimensions,
    ) -> costing_core::Result<GeometrySpec> {
        match (dimensions.diameter, dimensions.breadth, dimensions.height) {
            (Some(_), Some(_), Some(_)) => Err(CostError::validation(
                operation.as_str(),
                &["diameter", "breadth", "height"],
                "圓棒 (diameter + length) 與方料 (length + breadth + height) 尺寸只能擇一",
            )),
            (Some(diameter), _, _) => Ok(GeometrySpec::Round {
                diameter,
                length: dimensions.length,
            }),
            (None, Some(breadth), Some(height)) => Ok(GeometrySpec::Rectangular {
                length: dimensions.length,
                breadth,
                height,
            }),
            (None, _, _) => Err(CostError::validation(
                operation.as_str(),
                &["diameter", "breadth", "height"],
                "請提供圓棒 (diameter + length) 或方料 (length + breadth + height) 尺寸",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_turning_round_part() {
        let resolved =
            GeometryResolver::resolve(&Operation::Turning, &Dimensions::round(d(50), d(200)))
                .unwrap();

        assert_eq!(resolved.shape, Shape::Round);
        assert_eq!(resolved.volume_mm3, Decimal::new(39269875, 2));
    }

    #[test]
    fn test_milling_rectangular_part() {
        let resolved = GeometryResolver::resolve(
            &Operation::Milling,
            &Dimensions::rectangular(d(100), d(50), d(30)),
        )
        .unwrap();

        assert_eq!(resolved.shape, Shape::Rectangular);
        assert_eq!(resolved.volume_mm3, d(150_000));
    }

    #[test]
    fn test_milling_with_round_dimensions_names_missing_fields() {
        let err =
            GeometryResolver::resolve(&Operation::Milling, &Dimensions::round(d(50), d(200)))
                .unwrap_err();

        assert_eq!(err.fields(), ["breadth".to_string(), "height".to_string()]);
        let message = err.to_string();
        assert!(message.contains("milling"));
        assert!(message.contains("breadth"));
        assert!(message.contains("height"));
    }

    #[test]
    fn test_turning_forbids_rectangular_fields() {
        let dims = Dimensions::round(d(50), d(200)).with_height(d(10));
        let err = GeometryResolver::resolve(&Operation::Boring, &dims).unwrap_err();

        assert_eq!(err.fields(), ["height".to_string()]);
    }

    #[test]
    fn test_turning_requires_diameter() {
        let dims = Dimensions::new(d(200));
        let err = GeometryResolver::resolve(&Operation::Turning, &dims).unwrap_err();

        assert_eq!(err.fields(), ["diameter".to_string()]);
    }

    #[test]
    fn test_grinding_forbids_diameter() {
        let dims = Dimensions::rectangular(d(100), d(50), d(30)).with_diameter(d(20));
        let err = GeometryResolver::resolve(&Operation::Grinding, &dims).unwrap_err();

        assert_eq!(err.fields(), ["diameter".to_string()]);
    }

    #[rstest]
    #[case(Operation::Drilling)]
    #[case(Operation::Welding)]
    #[case(Operation::HeatTreatment)]
    fn test_flexible_operations_accept_either_set(#[case] operation: Operation) {
        let round = GeometryResolver::resolve(&operation, &Dimensions::round(d(20), d(40)));
        assert_eq!(round.unwrap().shape, Shape::Round);

        let rect =
            GeometryResolver::resolve(&operation, &Dimensions::rectangular(d(20), d(40), d(5)));
        assert_eq!(rect.unwrap().shape, Shape::Rectangular);
    }

    #[rstest]
    #[case(Dimensions::new(Decimal::from(40)))]
    #[case(Dimensions::new(Decimal::from(40)).with_breadth(Decimal::from(3)))]
    #[case(Dimensions::rectangular(Decimal::from(40), Decimal::from(3), Decimal::from(3)).with_diameter(Decimal::from(9)))]
    fn test_flexible_operations_reject_neither_or_both(#[case] dims: Dimensions) {
        let err = GeometryResolver::resolve(&Operation::Drilling, &dims).unwrap_err();
        assert!(matches!(err, CostError::Validation { .. }));
    }

    #[test]
    fn test_non_positive_dimension_rejected() {
        let dims = Dimensions::round(d(0), d(-5));
        let err = GeometryResolver::resolve(&Operation::Turning, &dims).unwrap_err();

        assert_eq!(err.fields(), ["diameter".to_string(), "length".to_string()]);
    }

    #[test]
    fn test_oversized_part_rejected_instead_of_overflowing() {
        let huge = d(10_000_000_000);
        let dims = Dimensions::rectangular(huge, huge, huge);
        let err = GeometryResolver::resolve(&Operation::Drilling, &dims).unwrap_err();

        assert!(matches!(err, CostError::Validation { .. }));
        assert_eq!(
            err.fields(),
            ["length".to_string(), "breadth".to_string(), "height".to_string()]
        );
    }

    #[test]
    fn test_rules_by_operation() {
        assert_eq!(
            DimensionRule::for_operation(&Operation::Turning),
            DimensionRule::RoundOnly
        );
        assert_eq!(
            DimensionRule::for_operation(&Operation::SurfaceTreatment),
            DimensionRule::RectangularOnly
        );
        assert_eq!(
            DimensionRule::for_operation(&Operation::from("laser cutting")),
            DimensionRule::Either
        );
    }
}
