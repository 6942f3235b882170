//! 成本彙總
//!
//! 單工序：D = A × (B + C)，OH = C × A，Profit = 10% × (D + OH)，
//! P&F = 2% × D，單價 = D + OH + Profit + P&F，外包機時費率 = B + 2C。
//!
//! 計算全程保留完整精度，只在產生輸出明細時捨入一次。

use costing_core::breakdown::{round_currency, round_hours};
use costing_core::{
    AggregateCostBreakdown, CalculationStep, CostBreakdown, CostError, CostPolicy, DutyCategory,
    Operation,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 單工序成本（未捨入）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostComponents {
    pub man_hours: Decimal,
    pub machine_hour_rate: Decimal,
    pub wage_rate: Decimal,
    pub basic_cost: Decimal,
    pub overheads: Decimal,
    pub profit: Decimal,
    pub packing_forwarding: Decimal,
    pub unit_cost: Decimal,
    pub miscellaneous_amount: Decimal,
    pub total_unit_cost_with_misc: Decimal,
    pub quantity: u32,
    pub total_cost: Decimal,
    pub outsourcing_mhr: Decimal,
}

impl CostComponents {
    /// 輸出邊界：金額 2 位、工時 4 位
    pub fn to_breakdown(&self) -> CostBreakdown {
        CostBreakdown {
            man_hours_per_unit: round_hours(self.man_hours),
            machine_hour_rate: round_currency(self.machine_hour_rate),
            wage_rate: round_currency(self.wage_rate),
            basic_cost_per_unit: round_currency(self.basic_cost),
            overheads_per_unit: round_currency(self.overheads),
            profit_per_unit: round_currency(self.profit),
            packing_forwarding_per_unit: round_currency(self.packing_forwarding),
            unit_cost: round_currency(self.unit_cost),
            miscellaneous_amount: round_currency(self.miscellaneous_amount),
            total_unit_cost_with_misc: round_currency(self.total_unit_cost_with_misc),
            quantity: self.quantity,
            total_cost: round_currency(self.total_cost),
            outsourcing_mhr: round_currency(self.outsourcing_mhr),
        }
    }

    /// 逐步計算說明（代入數值為捨入後的顯示值）
    pub fn calculation_steps(&self, policy: &CostPolicy) -> Vec<CalculationStep> {
        let b = self.to_breakdown();

        vec![
            CalculationStep::new(
                "inputs",
                "A = 每件工時, B = 機時費率, C = 工資率",
                format!(
                    "A = {}, B = {}, C = {}",
                    b.man_hours_per_unit, b.machine_hour_rate, b.wage_rate
                ),
                b.man_hours_per_unit,
            ),
            CalculationStep::new(
                "basic_cost",
                "D = A × (B + C)",
                format!(
                    "{} × ({} + {})",
                    b.man_hours_per_unit, b.machine_hour_rate, b.wage_rate
                ),
                b.basic_cost_per_unit,
            ),
            CalculationStep::new(
                "overheads",
                format!("OH = {} × C × A", policy.overhead_rate),
                format!(
                    "{} × {} × {}",
                    policy.overhead_rate, b.wage_rate, b.man_hours_per_unit
                ),
                b.overheads_per_unit,
            ),
            CalculationStep::new(
                "profit",
                format!("Profit = {} × (D + OH)", policy.profit_rate),
                format!(
                    "{} × ({} + {})",
                    policy.profit_rate, b.basic_cost_per_unit, b.overheads_per_unit
                ),
                b.profit_per_unit,
            ),
            CalculationStep::new(
                "packing_forwarding",
                format!("P&F = {} × D", policy.packing_forwarding_rate),
                format!(
                    "{} × {}",
                    policy.packing_forwarding_rate, b.basic_cost_per_unit
                ),
                b.packing_forwarding_per_unit,
            ),
            CalculationStep::new(
                "unit_cost",
                "Unit Cost = D + OH + Profit + P&F",
                format!(
                    "{} + {} + {} + {}",
                    b.basic_cost_per_unit,
                    b.overheads_per_unit,
                    b.profit_per_unit,
                    b.packing_forwarding_per_unit
                ),
                b.unit_cost,
            ),
            CalculationStep::new(
                "miscellaneous",
                "Misc = 使用者輸入",
                format!("{}", b.miscellaneous_amount),
                b.miscellaneous_amount,
            ),
            CalculationStep::new(
                "total_unit_cost_with_misc",
                "Unit Cost with Misc = Unit Cost + Misc",
                format!("{} + {}", b.unit_cost, b.miscellaneous_amount),
                b.total_unit_cost_with_misc,
            ),
            CalculationStep::new(
                "outsourcing_mhr",
                "Outsourcing MHR = B + 2C",
                format!("{} + (2 × {})", b.machine_hour_rate, b.wage_rate),
                b.outsourcing_mhr,
            ),
        ]
    }
}

/// 多工序彙總的單一工序輸入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCost {
    pub operation: Operation,
    pub duty: DutyCategory,
    /// A
    pub man_hours: Decimal,
    /// B
    pub machine_hour_rate: Decimal,
    /// C
    pub wage_rate: Decimal,
}

impl OperationCost {
    pub fn new(
        operation: Operation,
        duty: DutyCategory,
        man_hours: Decimal,
        machine_hour_rate: Decimal,
        wage_rate: Decimal,
    ) -> Self {
        Self {
            operation,
            duty,
            man_hours,
            machine_hour_rate,
            wage_rate,
        }
    }
}

/// 成本彙總器
pub struct CostAggregator;

impl CostAggregator {
    /// 單工序公式；金額超出 Decimal 範圍時回傳驗證錯誤
    pub fn single(
        policy: &CostPolicy,
        man_hours: Decimal,
        machine_hour_rate: Decimal,
        wage_rate: Decimal,
        quantity: u32,
        miscellaneous_amount: Decimal,
    ) -> costing_core::Result<CostComponents> {
        Self::checked_single(
            policy,
            man_hours,
            machine_hour_rate,
            wage_rate,
            quantity,
            miscellaneous_amount,
        )
        .ok_or_else(|| {
            out_of_range(&[
                "man_hours",
                "machine_hour_rate",
                "wage_rate",
                "miscellaneous_amount",
                "quantity",
            ])
        })
    }

    fn checked_single(
        policy: &CostPolicy,
        man_hours: Decimal,
        machine_hour_rate: Decimal,
        wage_rate: Decimal,
        quantity: u32,
        miscellaneous_amount: Decimal,
    ) -> Option<CostComponents> {
        let basic_cost = man_hours.checked_mul(machine_hour_rate.checked_add(wage_rate)?)?;
        let overheads = policy
            .overhead_rate
            .checked_mul(wage_rate)?
            .checked_mul(man_hours)?;
        let profit = policy
            .profit_rate
            .checked_mul(basic_cost.checked_add(overheads)?)?;
        let packing_forwarding = policy.packing_forwarding_rate.checked_mul(basic_cost)?;
        let unit_cost = basic_cost
            .checked_add(overheads)?
            .checked_add(profit)?
            .checked_add(packing_forwarding)?;
        let total_unit_cost_with_misc = unit_cost.checked_add(miscellaneous_amount)?;

        Some(CostComponents {
            man_hours,
            machine_hour_rate,
            wage_rate,
            basic_cost,
            overheads,
            profit,
            packing_forwarding,
            unit_cost,
            miscellaneous_amount,
            total_unit_cost_with_misc,
            quantity,
            total_cost: total_unit_cost_with_misc.checked_mul(Decimal::from(quantity))?,
            outsourcing_mhr: machine_hour_rate.checked_add(wage_rate.checked_mul(Decimal::TWO)?)?,
        })
    }

    /// 多工序公式；NRC 與材料費為已捨入的每件金額，加在雜項之前
    pub fn multi(
        policy: &CostPolicy,
        operations: &[OperationCost],
        quantity: u32,
        miscellaneous_amount: Decimal,
        nrc_per_unit: Decimal,
        material_cost_per_unit: Decimal,
    ) -> costing_core::Result<AggregateCostBreakdown> {
        Self::checked_multi(
            policy,
            operations,
            quantity,
            miscellaneous_amount,
            nrc_per_unit,
            material_cost_per_unit,
        )
        .ok_or_else(|| {
            out_of_range(&[
                "operations",
                "miscellaneous_amount",
                "nrc_per_unit",
                "material_cost_per_unit",
                "quantity",
            ])
        })
    }

    fn checked_multi(
        policy: &CostPolicy,
        operations: &[OperationCost],
        quantity: u32,
        miscellaneous_amount: Decimal,
        nrc_per_unit: Decimal,
        material_cost_per_unit: Decimal,
    ) -> Option<AggregateCostBreakdown> {
        let (total_man_hours, total_machine_cost, total_labor_cost) = operations.iter().try_fold(
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            |(hours, machine, labor), op| {
                Some((
                    hours.checked_add(op.man_hours)?,
                    machine.checked_add(op.man_hours.checked_mul(op.machine_hour_rate)?)?,
                    labor.checked_add(op.man_hours.checked_mul(op.wage_rate)?)?,
                ))
            },
        )?;

        let basic_cost = total_machine_cost.checked_add(total_labor_cost)?;
        let overheads = policy.overhead_rate.checked_mul(total_labor_cost)?;
        let profit = policy
            .profit_rate
            .checked_mul(basic_cost.checked_add(overheads)?)?;
        let packing_forwarding = policy.packing_forwarding_rate.checked_mul(basic_cost)?;
        let unit_cost = basic_cost
            .checked_add(overheads)?
            .checked_add(profit)?
            .checked_add(packing_forwarding)?;
        let total_unit_cost = unit_cost
            .checked_add(nrc_per_unit)?
            .checked_add(material_cost_per_unit)?
            .checked_add(miscellaneous_amount)?;
        let total_cost = total_unit_cost.checked_mul(Decimal::from(quantity))?;

        let (avg_machine_rate, avg_wage_rate) = if total_man_hours > Decimal::ZERO {
            (
                total_machine_cost.checked_div(total_man_hours)?,
                total_labor_cost.checked_div(total_man_hours)?,
            )
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };
        let outsourcing_mhr = avg_machine_rate.checked_add(avg_wage_rate.checked_mul(Decimal::TWO)?)?;

        Some(AggregateCostBreakdown {
            total_man_hours_per_unit: round_hours(total_man_hours),
            total_machine_cost_per_unit: round_currency(total_machine_cost),
            total_labor_cost_per_unit: round_currency(total_labor_cost),
            basic_cost_per_unit: round_currency(basic_cost),
            overheads_per_unit: round_currency(overheads),
            profit_per_unit: round_currency(profit),
            packing_forwarding_per_unit: round_currency(packing_forwarding),
            nrc_per_unit: round_currency(nrc_per_unit),
            material_cost_per_unit: round_currency(material_cost_per_unit),
            unit_cost_before_extras: round_currency(unit_cost),
            miscellaneous_amount: round_currency(miscellaneous_amount),
            total_unit_cost: round_currency(total_unit_cost),
            quantity,
            total_cost: round_currency(total_cost),
            outsourcing_mhr: round_currency(outsourcing_mhr),
        })
    }
}

fn out_of_range(fields: &[&str]) -> CostError {
    CostError::validation("cost_aggregation", fields, "金額超出可計算範圍")
}
