//! 材料成本計算

use costing_core::breakdown::{round_currency, round_to};
use costing_core::{CostError, Dimensions, GeometrySpec, Material, MaterialCostRecord, Shape};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 材料成本輸入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialCostInput {
    pub material: Material,
    pub dimensions: Dimensions,
    pub shape: Shape,

    /// 每公斤材料單價
    pub cost_per_kg: Decimal,

    /// 客供料
    #[serde(default)]
    pub is_free_issue: bool,
}

impl MaterialCostInput {
    pub fn new(
        material: Material,
        shape: Shape,
        dimensions: Dimensions,
        cost_per_kg: Decimal,
    ) -> Self {
        Self {
            material,
            dimensions,
            shape,
            cost_per_kg,
            is_free_issue: false,
        }
    }

    /// 建構器模式：標記為客供料
    pub fn free_issue(mut self) -> Self {
        self.is_free_issue = true;
        self
    }
}

/// 材料成本計算器
pub struct MaterialCostCalculator;

impl MaterialCostCalculator {
    /// 依外形計算體積 (mm³)；尺寸組與外形不符時為 0，溢位時為 None
    ///
    /// 不經過工序尺寸驗證，只看外形所需欄位是否齊全。
    pub fn volume_mm3(shape: Shape, dimensions: &Dimensions) -> Option<Decimal> {
        let geometry = match shape {
            Shape::Round => dimensions.diameter.map(|diameter| GeometrySpec::Round {
                diameter,
                length: dimensions.length,
            }),
            Shape::Rectangular => match (dimensions.breadth, dimensions.height) {
                (Some(breadth), Some(height)) => Some(GeometrySpec::Rectangular {
                    length: dimensions.length,
                    breadth,
                    height,
                }),
                _ => None,
            },
        };

        match geometry {
            Some(geometry) => geometry.volume_mm3(),
            None => Some(Decimal::ZERO),
        }
    }

    pub fn calculate(input: &MaterialCostInput) -> costing_core::Result<MaterialCostRecord> {
        if input.is_free_issue {
            tracing::debug!("材料 {} 為客供料，不計材料費", input.material);
            return Ok(MaterialCostRecord::free_issue(input.material.clone()));
        }

        let density = input.material.density_g_cm3();
        let (volume_cm3, weight_kg, cost) = Self::volume_mm3(input.shape, &input.dimensions)
            .and_then(|volume_mm3| {
                let volume_cm3 = volume_mm3 / Decimal::ONE_THOUSAND;
                let weight_kg = volume_cm3.checked_mul(density)? / Decimal::ONE_THOUSAND;
                let cost = weight_kg.checked_mul(input.cost_per_kg)?;
                Some((volume_cm3, weight_kg, cost))
            })
            .ok_or_else(|| {
                CostError::validation(
                    "material_cost",
                    &["dimensions", "cost_per_kg"],
                    "材料體積或成本超出可計算範圍",
                )
            })?;

        let record = MaterialCostRecord {
            material: input.material.clone(),
            is_free_issue: false,
            volume_cm3: round_to(volume_cm3, 3),
            density_g_cm3: Some(density),
            material_weight_kg: round_to(weight_kg, 3),
            material_cost_per_unit: round_currency(cost),
        };

        tracing::debug!(
            "材料成本: {} {} cm³ × {} g/cm³ = {} kg → {}",
            record.material,
            record.volume_cm3,
            density,
            record.material_weight_kg,
            record.material_cost_per_unit
        );
        Ok(record)
    }
}
