//! 成本政策配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CostError, MachineCategory};

/// 成本政策（工資、折舊、停機率等固定參數）
///
/// 引擎建立時注入，之後不再變動。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostPolicy {
    /// 傳統機台操作員月薪
    pub conventional_monthly_wage: Decimal,

    /// CNC/精密機台操作員月薪
    pub cnc_monthly_wage: Decimal,

    /// 工資換算的每月標準工時
    pub wage_hours_per_month: Decimal,

    /// 年折舊率（投資額的比例）
    pub depreciation_rate: Decimal,

    /// 維護費率（僅用於完整機時費率與保底計算）
    pub maintenance_rate: Decimal,

    /// 每度電費
    pub power_rate_per_unit: Decimal,

    /// 傳統機台停機率
    pub conventional_downtime_rate: Decimal,

    /// CNC 及其他機台停機率
    pub cnc_downtime_rate: Decimal,

    /// 標準年工作時數
    pub annual_working_hours: Decimal,

    /// 管理費率（以工資成本為基數）
    pub overhead_rate: Decimal,

    /// 利潤率（以基本成本 + 管理費為基數）
    pub profit_rate: Decimal,

    /// 包裝運輸費率（以基本成本為基數）
    pub packing_forwarding_rate: Decimal,

    /// 工時矩陣查無資料時的預設工時
    pub default_man_hours: Decimal,
}

impl Default for CostPolicy {
    fn default() -> Self {
        Self {
            conventional_monthly_wage: Decimal::from(15_000),
            cnc_monthly_wage: Decimal::from(20_000),
            wage_hours_per_month: Decimal::from(200),
            depreciation_rate: Decimal::new(10, 2),
            maintenance_rate: Decimal::new(5, 2),
            power_rate_per_unit: Decimal::from(5),
            conventional_downtime_rate: Decimal::new(7, 2),
            cnc_downtime_rate: Decimal::new(15, 2),
            annual_working_hours: Decimal::from(2400),
            overhead_rate: Decimal::ONE,
            profit_rate: Decimal::new(10, 2),
            packing_forwarding_rate: Decimal::new(2, 2),
            default_man_hours: Decimal::new(5, 1),
        }
    }
}

impl CostPolicy {
    /// 從 JSON 文件載入政策，缺少的欄位沿用預設值
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let policy: Self =
            serde_json::from_str(json).map_err(|e| CostError::InvalidConfig(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    /// 建構器模式：設置月薪
    pub fn with_monthly_wages(mut self, conventional: Decimal, cnc: Decimal) -> Self {
        self.conventional_monthly_wage = conventional;
        self.cnc_monthly_wage = cnc;
        self
    }

    /// 建構器模式：設置停機率
    pub fn with_downtime_rates(mut self, conventional: Decimal, cnc: Decimal) -> Self {
        self.conventional_downtime_rate = conventional;
        self.cnc_downtime_rate = cnc;
        self
    }

    /// 建構器模式：設置標準年工作時數
    pub fn with_annual_working_hours(mut self, hours: Decimal) -> Self {
        self.annual_working_hours = hours;
        self
    }

    /// 建構器模式：設置利潤率
    pub fn with_profit_rate(mut self, rate: Decimal) -> Self {
        self.profit_rate = rate;
        self
    }

    /// 建構器模式：設置維護費率
    pub fn with_maintenance_rate(mut self, rate: Decimal) -> Self {
        self.maintenance_rate = rate;
        self
    }

    /// 依機台類別取得停機率
    pub fn downtime_rate(&self, category: MachineCategory) -> Decimal {
        if category.is_conventional() {
            self.conventional_downtime_rate
        } else {
            self.cnc_downtime_rate
        }
    }

    /// 依機台類別取得月薪
    pub fn monthly_wage(&self, category: MachineCategory) -> Decimal {
        if category.is_conventional() {
            self.conventional_monthly_wage
        } else {
            self.cnc_monthly_wage
        }
    }

    /// 檢查參數合理性
    pub fn validate(&self) -> crate::Result<()> {
        let unit_rates = [
            ("depreciation_rate", self.depreciation_rate),
            ("maintenance_rate", self.maintenance_rate),
            ("conventional_downtime_rate", self.conventional_downtime_rate),
            ("cnc_downtime_rate", self.cnc_downtime_rate),
            ("profit_rate", self.profit_rate),
            ("packing_forwarding_rate", self.packing_forwarding_rate),
        ];
        for (name, rate) in unit_rates {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                return Err(CostError::InvalidConfig(format!(
                    "{name} 必須介於 0 與 1 之間，實際為 {rate}"
                )));
            }
        }

        let positives = [
            ("wage_hours_per_month", self.wage_hours_per_month),
            ("annual_working_hours", self.annual_working_hours),
            ("default_man_hours", self.default_man_hours),
        ];
        for (name, value) in positives {
            if value <= Decimal::ZERO {
                return Err(CostError::InvalidConfig(format!(
                    "{name} 必須大於 0，實際為 {value}"
                )));
            }
        }

        let non_negatives = [
            ("conventional_monthly_wage", self.conventional_monthly_wage),
            ("cnc_monthly_wage", self.cnc_monthly_wage),
            ("power_rate_per_unit", self.power_rate_per_unit),
            ("overhead_rate", self.overhead_rate),
        ];
        for (name, value) in non_negatives {
            if value < Decimal::ZERO {
                return Err(CostError::InvalidConfig(format!(
                    "{name} 不可為負數，實際為 {value}"
                )));
            }
        }

        Ok(())
    }
}
