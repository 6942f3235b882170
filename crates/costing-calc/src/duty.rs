//! 負荷等級判定
//!
//! 主路徑依幾何門檻分級（尺寸越大等級不降），尺寸組與外形不符時
//! 改用體積評分；最後依材料與工序做只升不降的調整。

use costing_core::{Dimensions, DutyCategory, GeometrySpec, Material, Operation, Shape};
use rust_decimal::Decimal;

/// 車削/搪孔的圓棒門檻（直徑, 長度）
#[derive(Debug, Clone, Copy)]
struct TurningThresholds {
    /// 兩者皆嚴格小於 → light
    light_below: (i64, i64),
    /// 兩者皆不超過 → medium
    medium_up_to: (i64, i64),
}

impl TurningThresholds {
    fn for_material(material: &Material) -> Self {
        match material {
            Material::Steel => Self {
                light_below: (50, 200),
                medium_up_to: (100, 500),
            },
            Material::Titanium => Self {
                light_below: (30, 150),
                medium_up_to: (60, 300),
            },
            // 鋁及未知材料
            _ => Self {
                light_below: (80, 500),
                medium_up_to: (150, 1000),
            },
        }
    }

    fn classify(&self, diameter: Decimal, length: Decimal) -> DutyCategory {
        let (light_d, light_l) = self.light_below;
        let (medium_d, medium_l) = self.medium_up_to;

        if diameter < Decimal::from(light_d) && length < Decimal::from(light_l) {
            DutyCategory::Light
        } else if diameter <= Decimal::from(medium_d) && length <= Decimal::from(medium_l) {
            DutyCategory::Medium
        } else {
            DutyCategory::Heavy
        }
    }
}

/// 負荷判定器
pub struct DutyClassifier;

impl DutyClassifier {
    /// 方料最大邊長門檻 (mm)
    const RECT_LIGHT_MAX: i64 = 750;
    const RECT_MEDIUM_MAX: i64 = 1500;

    /// 其他工序圓棒門檻（直徑, 長度）
    const ROUND_LIGHT_MAX: (i64, i64) = (100, 300);
    const ROUND_MEDIUM_MAX: (i64, i64) = (300, 1200);

    /// 體積評分門檻
    const SCORE_LIGHT_BELOW: i64 = 5;
    const SCORE_MEDIUM_BELOW: i64 = 20;

    /// 依已驗證幾何判定
    pub fn classify_geometry(
        geometry: &GeometrySpec,
        material: &Material,
        operation: &Operation,
    ) -> DutyCategory {
        Self::classify(geometry.shape(), &geometry.to_dimensions(), material, operation)
    }

    /// 依外形 + 原始尺寸判定
    pub fn classify(
        shape: Shape,
        dimensions: &Dimensions,
        material: &Material,
        operation: &Operation,
    ) -> DutyCategory {
        let base = match Self::geometric_duty(shape, dimensions, material, operation) {
            Some(duty) => duty,
            None => {
                tracing::debug!("尺寸組與外形 {} 不符，改用體積評分判定負荷", shape);
                Self::volume_score_duty(shape, dimensions, material, operation)
            }
        };

        let adjusted = Self::adjust(base, material, operation);
        tracing::debug!(
            "負荷判定: 外形 {}, 材料 {}, 工序 {} → 基礎 {} / 調整後 {}",
            shape,
            material,
            operation,
            base,
            adjusted
        );
        adjusted
    }

    /// 幾何門檻（主路徑，未調整）；尺寸組不完整時回傳 None
    pub fn geometric_duty(
        shape: Shape,
        dimensions: &Dimensions,
        material: &Material,
        operation: &Operation,
    ) -> Option<DutyCategory> {
        match shape {
            Shape::Rectangular => {
                let (breadth, height) = (dimensions.breadth?, dimensions.height?);
                let max_dim = dimensions.length.max(breadth).max(height);

                Some(if max_dim <= Decimal::from(Self::RECT_LIGHT_MAX) {
                    DutyCategory::Light
                } else if max_dim <= Decimal::from(Self::RECT_MEDIUM_MAX) {
                    DutyCategory::Medium
                } else {
                    DutyCategory::Heavy
                })
            }
            Shape::Round => {
                let diameter = dimensions.diameter?;
                let length = dimensions.length;

                if operation.is_turning_family() {
                    return Some(TurningThresholds::for_material(material).classify(diameter, length));
                }

                let (light_d, light_l) = Self::ROUND_LIGHT_MAX;
                let (medium_d, medium_l) = Self::ROUND_MEDIUM_MAX;
                Some(
                    if diameter <= Decimal::from(light_d) && length <= Decimal::from(light_l) {
                        DutyCategory::Light
                    } else if diameter <= Decimal::from(medium_d)
                        && length <= Decimal::from(medium_l)
                    {
                        DutyCategory::Medium
                    } else {
                        DutyCategory::Heavy
                    },
                )
            }
        }
    }

    /// 體積評分（備援路徑，未調整）
    ///
    /// score = (體積 mm³ / 1e6) × 材料係數 × 工序係數
    pub fn volume_score_duty(
        shape: Shape,
        dimensions: &Dimensions,
        material: &Material,
        operation: &Operation,
    ) -> DutyCategory {
        let volume = Self::best_effort_volume(shape, dimensions);
        let score =
            volume / Decimal::from(1_000_000) * material.duty_factor() * operation.duty_factor();

        if score < Decimal::from(Self::SCORE_LIGHT_BELOW) {
            DutyCategory::Light
        } else if score < Decimal::from(Self::SCORE_MEDIUM_BELOW) {
            DutyCategory::Medium
        } else {
            DutyCategory::Heavy
        }
    }

    /// 以實際提供的完整尺寸組估算體積；都不完整時視為 0，溢位時取最大值
    fn best_effort_volume(shape: Shape, dimensions: &Dimensions) -> Decimal {
        let round = dimensions.diameter.map(|diameter| GeometrySpec::Round {
            diameter,
            length: dimensions.length,
        });
        let rectangular = match (dimensions.breadth, dimensions.height) {
            (Some(breadth), Some(height)) => Some(GeometrySpec::Rectangular {
                length: dimensions.length,
                breadth,
                height,
            }),
            _ => None,
        };

        let preferred = match shape {
            Shape::Round => round.or(rectangular),
            Shape::Rectangular => rectangular.or(round),
        };
        preferred
            .map(|g| g.volume_mm3().unwrap_or(Decimal::MAX))
            .unwrap_or(Decimal::ZERO)
    }

    /// 材料與工序調整（只升不降）
    fn adjust(base: DutyCategory, material: &Material, operation: &Operation) -> DutyCategory {
        let mut duty = base;

        if matches!(material, Material::Steel | Material::Titanium) {
            if duty == DutyCategory::Light {
                duty = duty.next();
            }
            if *material == Material::Titanium && duty == DutyCategory::Medium {
                duty = duty.next();
            }
        }

        if operation.is_demanding() {
            duty = duty.next();
        }

        duty
    }
}
