//! 成本結果模型
//!
//! 所有結果皆為不可變快照。金額在輸出邊界四捨五入到 2 位小數，
//! 工時 4 位，重量與體積 (cm³) 3 位；中間計算保留完整精度。

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{Dimensions, DutyCategory, MachineCategory, MachineRecord, Material, Operation, Shape};

/// 依指定小數位四捨五入（銀行家捨入）
pub fn round_to(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

/// 金額：2 位小數
pub fn round_currency(value: Decimal) -> Decimal {
    round_to(value, 2)
}

/// 工時：4 位小數
pub fn round_hours(value: Decimal) -> Decimal {
    round_to(value, 4)
}

/// 計算過程的單一步驟（公式 + 代入數值 + 結果）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationStep {
    /// 步驟名稱
    pub name: String,

    /// 公式
    pub formula: String,

    /// 代入數值後的算式
    pub calculation: String,

    /// 結果
    pub result: Decimal,
}

impl CalculationStep {
    pub fn new(
        name: impl Into<String>,
        formula: impl Into<String>,
        calculation: impl Into<String>,
        result: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            formula: formula.into(),
            calculation: calculation.into(),
            result,
        }
    }
}

/// 單工序成本明細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// A - 每件工時
    pub man_hours_per_unit: Decimal,

    /// B - 機時費率 (₹/hr)
    pub machine_hour_rate: Decimal,

    /// C - 工資率 (₹/hr)
    pub wage_rate: Decimal,

    /// D = A × (B + C)
    pub basic_cost_per_unit: Decimal,

    /// OH = C × A
    pub overheads_per_unit: Decimal,

    /// Profit = 10% × (D + OH)
    pub profit_per_unit: Decimal,

    /// P&F = 2% × D
    pub packing_forwarding_per_unit: Decimal,

    /// D + OH + Profit + P&F
    pub unit_cost: Decimal,

    /// 雜項金額
    pub miscellaneous_amount: Decimal,

    /// 單價 + 雜項
    pub total_unit_cost_with_misc: Decimal,

    /// 數量
    pub quantity: u32,

    /// (單價 + 雜項) × 數量
    pub total_cost: Decimal,

    /// 外包機時費率 = B + 2C
    pub outsourcing_mhr: Decimal,
}

/// 多工序彙總成本明細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCostBreakdown {
    pub total_man_hours_per_unit: Decimal,
    pub total_machine_cost_per_unit: Decimal,
    pub total_labor_cost_per_unit: Decimal,
    pub basic_cost_per_unit: Decimal,
    pub overheads_per_unit: Decimal,
    pub profit_per_unit: Decimal,
    pub packing_forwarding_per_unit: Decimal,
    pub nrc_per_unit: Decimal,
    pub material_cost_per_unit: Decimal,
    /// 未含 NRC、材料、雜項的單價
    pub unit_cost_before_extras: Decimal,
    pub miscellaneous_amount: Decimal,
    pub total_unit_cost: Decimal,
    pub quantity: u32,
    pub total_cost: Decimal,
    /// 以加權平均機時費率與工資率計算
    pub outsourcing_mhr: Decimal,
}

/// 非經常性成本 (NRC) 與攤提結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NrcRecord {
    pub tooling_cost: Decimal,
    pub development_cost: Decimal,
    pub cnc_programming_cost: Decimal,
    pub special_process_cost: Decimal,
    pub other_nrc_cost: Decimal,
    pub total_nrc: Decimal,
    pub nrc_per_unit: Decimal,
    /// 實際用於攤提的數量
    pub amortization_quantity: u32,
}

/// 材料成本結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialCostRecord {
    pub material: Material,

    /// 客供料（不計材料費）
    pub is_free_issue: bool,

    /// 體積 (cm³)
    pub volume_cm3: Decimal,

    /// 密度 (g/cm³)，客供料時不適用
    pub density_g_cm3: Option<Decimal>,

    /// 重量 (kg)
    pub material_weight_kg: Decimal,

    /// 每件材料成本
    pub material_cost_per_unit: Decimal,
}

impl MaterialCostRecord {
    /// 客供料結果：成本與重量皆為零
    pub fn free_issue(material: Material) -> Self {
        Self {
            material,
            is_free_issue: true,
            volume_cm3: Decimal::ZERO,
            density_g_cm3: None,
            material_weight_kg: Decimal::ZERO,
            material_cost_per_unit: Decimal::ZERO,
        }
    }
}

/// 完整機時費率計算明細（含維護費）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MhrBreakdown {
    pub machine_category: MachineCategory,
    pub investment_cost: Decimal,
    pub power_rating_kw: Decimal,
    pub available_hours_per_annum: Decimal,
    pub downtime_rate: Decimal,
    pub downtime_hours: Decimal,
    /// U = 可用時數 − 停機時數
    pub utilization_hours: Decimal,
    /// 每小時電費 = kW × 電價
    pub power_charges: Decimal,
    /// 每小時折舊 = 投資額 × 折舊率 / U
    pub depreciation_per_hour: Decimal,
    /// M = 折舊 + 電費
    pub machine_utilization_cost: Decimal,
    pub maintenance_rate: Decimal,
    /// B = M × (1 + 維護費率)
    pub machine_hour_rate: Decimal,
}

impl MhrBreakdown {
    /// 輸出用：時數與金額欄位取 2 位小數
    pub fn rounded(&self) -> Self {
        Self {
            downtime_hours: round_currency(self.downtime_hours),
            utilization_hours: round_currency(self.utilization_hours),
            power_charges: round_currency(self.power_charges),
            depreciation_per_hour: round_currency(self.depreciation_per_hour),
            machine_utilization_cost: round_currency(self.machine_utilization_cost),
            machine_hour_rate: round_currency(self.machine_hour_rate),
            ..self.clone()
        }
    }
}

/// 單件成本估算結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCostEstimate {
    pub duty: DutyCategory,
    pub machine: MachineRecord,
    pub machine_category: MachineCategory,
    pub shape: Shape,
    pub dimensions: Dimensions,
    /// 體積 (mm³)，2 位小數
    pub volume_mm3: Decimal,
    pub material: Material,
    pub operation: Operation,
    pub cost_breakdown: CostBreakdown,
    pub calculation_steps: Vec<CalculationStep>,
}

impl UnitCostEstimate {
    /// 依名稱取得計算步驟
    pub fn step(&self, name: &str) -> Option<&CalculationStep> {
        self.calculation_steps.iter().find(|s| s.name == name)
    }
}

/// 快速估算結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickEstimate {
    pub machine_name: String,
    pub machine_category: MachineCategory,
    pub operation: Operation,
    pub duty: DutyCategory,
    pub quantity: u32,
    pub cost_breakdown: CostBreakdown,
}
