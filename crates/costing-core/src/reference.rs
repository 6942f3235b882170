//! 參考資料查詢介面
//!
//! 機台、工序、負荷與機時費率配置由外部儲存維護，引擎只透過
//! [`ReferenceCatalog`] 唯讀查詢。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::MachineRecord;

/// 名稱正規化：小寫、底線與連字號轉空白、合併空白、去除結尾 "duty"
///
/// "Medium_Duty" / "medium-duty" / " Medium  duty " 皆得到 "medium"。
pub fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase().replace(['_', '-'], " ");
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.strip_suffix(" duty") {
        Some(stripped) => stripped.to_string(),
        None => collapsed,
    }
}

/// 文字欄位轉數值；無法解析或空白視為缺值（不是零）
pub fn parse_decimal_field(value: Option<&str>) -> Option<Decimal> {
    let text = value?.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// 參考資料查詢錯誤
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("參考資料暫不可用: {0}")]
    Unavailable(String),

    #[error("參考資料格式錯誤: {0}")]
    Malformed(String),
}

pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// 機時費率配置記錄（數值以文字儲存）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MhrConfigRecord {
    /// 記錄ID
    pub id: i64,

    /// 工序ID
    pub op_type_id: i64,

    /// 負荷ID
    pub duty_id: i64,

    /// 機台ID
    pub machine_id: i64,

    /// 工序名稱（關聯查詢帶出）
    pub operation_name: String,

    /// 負荷名稱（關聯查詢帶出）
    pub duty_name: String,

    /// 機台名稱（關聯查詢帶出）
    pub machine_name: String,

    /// 投資額
    pub investment_cost: Option<String>,

    /// 電力額定 (kW)
    pub elect_power_rating: Option<String>,

    /// 年可用時數
    pub available_hrs_per_annum: Option<String>,

    /// 預先計算的機時費率
    pub machine_hr_rate: Option<String>,
}

impl MhrConfigRecord {
    /// 創建新的配置記錄（數值欄位為空）
    pub fn new(
        id: i64,
        (op_type_id, operation_name): (i64, &str),
        (duty_id, duty_name): (i64, &str),
        (machine_id, machine_name): (i64, &str),
    ) -> Self {
        Self {
            id,
            op_type_id,
            duty_id,
            machine_id,
            operation_name: operation_name.to_string(),
            duty_name: duty_name.to_string(),
            machine_name: machine_name.to_string(),
            investment_cost: None,
            elect_power_rating: None,
            available_hrs_per_annum: None,
            machine_hr_rate: None,
        }
    }

    /// 建構器模式：設置成本驅動因子
    pub fn with_cost_drivers(
        mut self,
        investment_cost: &str,
        elect_power_rating: &str,
        available_hrs_per_annum: Option<&str>,
    ) -> Self {
        self.investment_cost = Some(investment_cost.to_string());
        self.elect_power_rating = Some(elect_power_rating.to_string());
        self.available_hrs_per_annum = available_hrs_per_annum.map(str::to_string);
        self
    }

    /// 建構器模式：設置預先計算的機時費率
    pub fn with_machine_hr_rate(mut self, rate: &str) -> Self {
        self.machine_hr_rate = Some(rate.to_string());
        self
    }

    pub fn investment_cost_value(&self) -> Option<Decimal> {
        parse_decimal_field(self.investment_cost.as_deref())
    }

    pub fn power_rating_value(&self) -> Option<Decimal> {
        parse_decimal_field(self.elect_power_rating.as_deref())
    }

    pub fn available_hours_value(&self) -> Option<Decimal> {
        parse_decimal_field(self.available_hrs_per_annum.as_deref())
    }

    pub fn machine_hr_rate_value(&self) -> Option<Decimal> {
        parse_decimal_field(self.machine_hr_rate.as_deref())
    }
}

/// 唯讀參考資料查詢能力（由外部實作）
pub trait ReferenceCatalog: Send + Sync {
    /// 依名稱精確查詢機台
    fn find_machine_by_name(&self, name: &str) -> LookupResult<Option<MachineRecord>>;

    /// 依名稱查詢工序ID（不分大小寫、忽略前後空白）
    fn find_operation_id_by_name(&self, name: &str) -> LookupResult<Option<i64>>;

    /// 依正規化名稱查詢負荷ID
    fn find_duty_id_by_name(&self, normalized_name: &str) -> LookupResult<Option<i64>>;

    /// 依外鍵三元組查詢唯一配置
    fn find_mhr_config(
        &self,
        operation_id: i64,
        duty_id: i64,
        machine_id: i64,
    ) -> LookupResult<Option<MhrConfigRecord>>;

    /// 依工序與負荷名稱掃描所有配置
    fn scan_mhr_config_by_operation_duty(
        &self,
        operation_name: &str,
        duty_name: &str,
    ) -> LookupResult<Vec<MhrConfigRecord>>;
}

/// 記憶體參考資料（測試與種子資料用）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    /// 工序 (ID, 名稱)
    pub operations: Vec<(i64, String)>,

    /// 負荷 (ID, 名稱)
    pub duties: Vec<(i64, String)>,

    /// 機台
    pub machines: Vec<MachineRecord>,

    /// 機時費率配置
    pub mhr_configs: Vec<MhrConfigRecord>,
}

impl InMemoryCatalog {
    /// 創建空的參考資料
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：添加工序
    pub fn with_operation(mut self, id: i64, name: &str) -> Self {
        self.operations.push((id, name.to_string()));
        self
    }

    /// 建構器模式：添加負荷
    pub fn with_duty(mut self, id: i64, name: &str) -> Self {
        self.duties.push((id, name.to_string()));
        self
    }

    /// 建構器模式：添加機台
    pub fn with_machine(mut self, machine: MachineRecord) -> Self {
        self.machines.push(machine);
        self
    }

    /// 建構器模式：添加機時費率配置
    pub fn with_mhr_config(mut self, record: MhrConfigRecord) -> Self {
        self.mhr_configs.push(record);
        self
    }
}

impl ReferenceCatalog for InMemoryCatalog {
    fn find_machine_by_name(&self, name: &str) -> LookupResult<Option<MachineRecord>> {
        Ok(self.machines.iter().find(|m| m.name == name).cloned())
    }

    fn find_operation_id_by_name(&self, name: &str) -> LookupResult<Option<i64>> {
        let key = name.trim().to_lowercase();
        Ok(self
            .operations
            .iter()
            .find(|(_, op_name)| op_name.trim().to_lowercase() == key)
            .map(|(id, _)| *id))
    }

    fn find_duty_id_by_name(&self, normalized_name: &str) -> LookupResult<Option<i64>> {
        Ok(self
            .duties
            .iter()
            .find(|(_, duty_name)| normalize_name(duty_name) == normalized_name)
            .map(|(id, _)| *id))
    }

    fn find_mhr_config(
        &self,
        operation_id: i64,
        duty_id: i64,
        machine_id: i64,
    ) -> LookupResult<Option<MhrConfigRecord>> {
        Ok(self
            .mhr_configs
            .iter()
            .find(|r| {
                r.op_type_id == operation_id && r.duty_id == duty_id && r.machine_id == machine_id
            })
            .cloned())
    }

    fn scan_mhr_config_by_operation_duty(
        &self,
        operation_name: &str,
        duty_name: &str,
    ) -> LookupResult<Vec<MhrConfigRecord>> {
        let op_key = normalize_name(operation_name);
        let duty_key = normalize_name(duty_name);
        Ok(self
            .mhr_configs
            .iter()
            .filter(|r| {
                normalize_name(&r.operation_name) == op_key
                    && normalize_name(&r.duty_name) == duty_key
            })
            .cloned()
            .collect())
    }
}
