//! 非經常性成本 (NRC) 攤提

use costing_core::breakdown::round_currency;
use costing_core::{CostError, NrcRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// NRC 輸入
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NrcInput {
    pub tooling_cost: Decimal,
    pub development_cost: Decimal,
    pub cnc_programming_cost: Decimal,
    pub special_process_cost: Decimal,
    pub other_nrc_cost: Decimal,

    /// 訂購數量
    pub ordered_quantity: u32,

    /// 攤提數量（未提供或為 0 時使用訂購數量）
    pub amortize_over_quantity: Option<u32>,
}

impl NrcInput {
    /// 創建只有訂購數量的輸入
    pub fn new(ordered_quantity: u32) -> Self {
        Self {
            ordered_quantity,
            ..Self::default()
        }
    }

    /// 建構器模式：設置各項成本
    pub fn with_costs(
        mut self,
        tooling: Decimal,
        development: Decimal,
        cnc_programming: Decimal,
        special_process: Decimal,
        other: Decimal,
    ) -> Self {
        self.tooling_cost = tooling;
        self.development_cost = development;
        self.cnc_programming_cost = cnc_programming;
        self.special_process_cost = special_process;
        self.other_nrc_cost = other;
        self
    }

    /// 建構器模式：設置模具費
    pub fn with_tooling(mut self, tooling: Decimal) -> Self {
        self.tooling_cost = tooling;
        self
    }

    /// 建構器模式：設置攤提數量
    pub fn with_amortize_over(mut self, quantity: u32) -> Self {
        self.amortize_over_quantity = Some(quantity);
        self
    }

    /// NRC 總額；超出 Decimal 範圍時為 None
    pub fn total(&self) -> Option<Decimal> {
        self.tooling_cost
            .checked_add(self.development_cost)?
            .checked_add(self.cnc_programming_cost)?
            .checked_add(self.special_process_cost)?
            .checked_add(self.other_nrc_cost)
    }

    /// 實際攤提數量
    pub fn amortization_quantity(&self) -> u32 {
        match self.amortize_over_quantity {
            Some(quantity) if quantity > 0 => quantity,
            _ => self.ordered_quantity,
        }
    }
}

/// NRC 攤提計算
pub struct NrcAmortizer;

impl NrcAmortizer {
    /// 每件 NRC（未捨入）；攤提數量為 0 時為 0
    pub fn per_unit(input: &NrcInput) -> Option<Decimal> {
        match input.amortization_quantity() {
            0 => Some(Decimal::ZERO),
            quantity => input.total()?.checked_div(Decimal::from(quantity)),
        }
    }

    pub fn amortize(input: &NrcInput) -> costing_core::Result<NrcRecord> {
        let (Some(total), Some(per_unit)) = (input.total(), Self::per_unit(input)) else {
            return Err(CostError::validation(
                "nrc",
                &[
                    "tooling_cost",
                    "development_cost",
                    "cnc_programming_cost",
                    "special_process_cost",
                    "other_nrc_cost",
                ],
                "NRC 總額超出可計算範圍",
            ));
        };

        let record = NrcRecord {
            tooling_cost: round_currency(input.tooling_cost),
            development_cost: round_currency(input.development_cost),
            cnc_programming_cost: round_currency(input.cnc_programming_cost),
            special_process_cost: round_currency(input.special_process_cost),
            other_nrc_cost: round_currency(input.other_nrc_cost),
            total_nrc: round_currency(total),
            nrc_per_unit: round_currency(per_unit),
            amortization_quantity: input.amortization_quantity(),
        };

        tracing::debug!(
            "NRC 攤提: 總額 {} / {} 件 = {}",
            record.total_nrc,
            record.amortization_quantity,
            record.nrc_per_unit
        );
        Ok(record)
    }
}
