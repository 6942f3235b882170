//! 機時費率 (MHR) 解析
//!
//! 依序嘗試以下來源，第一個有結果者即回傳：
//! 1. 方法論費率表（不加維護費）
//! 2. 以工序/負荷/機台ID 精確查詢配置記錄
//! 3. 依工序與負荷掃描配置記錄，以機台名稱評分挑選
//!
//! 全部落空時回傳 [`CostError::UnresolvedRate`]；呼叫端可改用
//! [`MachineHourRateResolver::resolve_with_fallback`]，以機台類別的
//! 預設投資額計算完整機時費率（含維護費）。
//!
//! 第 2、3 層的查詢錯誤只記錄警告，視為該層未命中。

use costing_core::{
    normalize_name, CostError, CostPolicy, DutyCategory, LookupError, MachineCategory,
    MhrBreakdown, MhrConfigRecord, Operation, ReferenceCatalog,
};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

use crate::methodology::MethodologyTable;

/// 費率來源（解析順序）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// 方法論費率表
    Methodology,
    /// 外鍵精確查詢
    ConfigByKeys,
    /// 名稱評分掃描
    ConfigScan,
}

impl RateSource {
    pub const RESOLUTION_ORDER: [RateSource; 3] =
        [Self::Methodology, Self::ConfigByKeys, Self::ConfigScan];
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Methodology => f.write_str("methodology table"),
            Self::ConfigByKeys => f.write_str("config by keys"),
            Self::ConfigScan => f.write_str("config scan"),
        }
    }
}

/// 解析查詢
#[derive(Debug, Clone, Copy)]
pub struct RateQuery<'a> {
    pub operation: &'a Operation,
    pub duty: DutyCategory,
    pub machine_name: &'a str,
}

impl<'a> RateQuery<'a> {
    pub fn new(operation: &'a Operation, duty: DutyCategory, machine_name: &'a str) -> Self {
        Self {
            operation,
            duty,
            machine_name,
        }
    }

    /// 機台類別一律由機台名稱推導
    pub fn category(&self) -> MachineCategory {
        MachineCategory::from_machine_name(self.machine_name)
    }
}

/// 已解析的費率（未捨入）與其來源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRate {
    pub rate: Decimal,
    pub source: RateSource,
}

/// 基本機時費率：折舊 + 電費（不含維護費）
///
/// 可用工時扣除停機後不為正，或數值超出 Decimal 範圍時無法計算，回傳 None。
pub fn basic_machine_hour_rate(
    policy: &CostPolicy,
    investment_cost: Decimal,
    power_rating_kw: Decimal,
    available_hours: Decimal,
    downtime_rate: Decimal,
) -> Option<Decimal> {
    let utilization_hours = available_hours.checked_mul(Decimal::ONE - downtime_rate)?;
    if utilization_hours <= Decimal::ZERO {
        return None;
    }

    let depreciation = investment_cost
        .checked_mul(policy.depreciation_rate)?
        .checked_div(utilization_hours)?;
    depreciation.checked_add(power_rating_kw.checked_mul(policy.power_rate_per_unit)?)
}

/// 完整機時費率（含維護費），結果未捨入
///
/// 未提供或不為正的年可用時數以政策的標準年工作時數代替。
/// 數值超出 Decimal 範圍時回傳 None。
pub fn complete_machine_hour_rate(
    policy: &CostPolicy,
    investment_cost: Decimal,
    power_rating_kw: Decimal,
    category: MachineCategory,
    available_hours: Option<Decimal>,
) -> Option<MhrBreakdown> {
    let available_hours = available_hours
        .filter(|hours| *hours > Decimal::ZERO)
        .unwrap_or(policy.annual_working_hours);
    let downtime_rate = policy.downtime_rate(category);

    let downtime_hours = available_hours.checked_mul(downtime_rate)?;
    let utilization_hours = available_hours.checked_sub(downtime_hours)?;
    let power_charges = power_rating_kw.checked_mul(policy.power_rate_per_unit)?;
    let depreciation_per_hour = if utilization_hours > Decimal::ZERO {
        investment_cost
            .checked_mul(policy.depreciation_rate)?
            .checked_div(utilization_hours)?
    } else {
        Decimal::ZERO
    };
    let machine_utilization_cost = depreciation_per_hour.checked_add(power_charges)?;
    let machine_hour_rate =
        machine_utilization_cost.checked_mul(Decimal::ONE + policy.maintenance_rate)?;

    Some(MhrBreakdown {
        machine_category: category,
        investment_cost,
        power_rating_kw,
        available_hours_per_annum: available_hours,
        downtime_rate,
        downtime_hours,
        utilization_hours,
        power_charges,
        depreciation_per_hour,
        machine_utilization_cost,
        maintenance_rate: policy.maintenance_rate,
        machine_hour_rate,
    })
}

/// 各機台類別的保底投資額與電力額定
pub fn fallback_cost_drivers(category: MachineCategory) -> (Decimal, Decimal) {
    match category {
        MachineCategory::Conventional => (Decimal::from(1_000_000), Decimal::from(15)),
        MachineCategory::Cnc3Axis => (Decimal::from(3_000_000), Decimal::from(20)),
        MachineCategory::Cnc5Axis | MachineCategory::Spm => {
            (Decimal::from(5_000_000), Decimal::from(25))
        }
    }
}

/// 機時費率解析器
pub struct MachineHourRateResolver {
    catalog: Arc<dyn ReferenceCatalog>,
    policy: CostPolicy,
    methodology: MethodologyTable,
}

impl MachineHourRateResolver {
    /// 以標準方法論費率表建立
    pub fn new(catalog: Arc<dyn ReferenceCatalog>, policy: CostPolicy) -> Self {
        let methodology = MethodologyTable::standard(&policy);
        Self::with_methodology(catalog, policy, methodology)
    }

    /// 指定方法論費率表
    pub fn with_methodology(
        catalog: Arc<dyn ReferenceCatalog>,
        policy: CostPolicy,
        methodology: MethodologyTable,
    ) -> Self {
        Self {
            catalog,
            policy,
            methodology,
        }
    }

    pub fn policy(&self) -> &CostPolicy {
        &self.policy
    }

    /// 依序嘗試各來源
    pub fn resolve(&self, query: &RateQuery<'_>) -> costing_core::Result<ResolvedRate> {
        for source in RateSource::RESOLUTION_ORDER {
            tracing::debug!(
                "嘗試費率來源 [{}]: 工序 {}, 負荷 {}, 機台 '{}'",
                source,
                query.operation,
                query.duty,
                query.machine_name
            );

            match self.try_source(source, query) {
                Ok(Some(rate)) => {
                    tracing::debug!("費率來源 [{}] 命中: {}", source, rate);
                    return Ok(ResolvedRate { rate, source });
                }
                Ok(None) => {
                    tracing::debug!("費率來源 [{}] 未命中", source);
                }
                Err(err) => {
                    tracing::warn!("費率來源 [{}] 查詢失敗，略過: {}", source, err);
                }
            }
        }

        Err(CostError::UnresolvedRate {
            operation: query.operation.to_string(),
            duty: query.duty.to_string(),
            machine: query.machine_name.to_string(),
        })
    }

    /// 解析失敗時改用類別保底費率（含維護費），不會失敗
    ///
    /// 政策數值大到保底費率溢位時取 `Decimal::MAX`，由後續彙總回報錯誤。
    pub fn resolve_with_fallback(&self, query: &RateQuery<'_>) -> Decimal {
        match self.resolve(query) {
            Ok(resolved) => resolved.rate,
            Err(err) => {
                let category = query.category();
                let (investment_cost, power_rating_kw) = fallback_cost_drivers(category);
                let rate = complete_machine_hour_rate(
                    &self.policy,
                    investment_cost,
                    power_rating_kw,
                    category,
                    None,
                )
                .map_or(Decimal::MAX, |breakdown| breakdown.machine_hour_rate);
                tracing::warn!("{}；改用 {} 類別保底費率 {}", err, category, rate);
                rate
            }
        }
    }

    fn try_source(
        &self,
        source: RateSource,
        query: &RateQuery<'_>,
    ) -> Result<Option<Decimal>, LookupError> {
        match source {
            RateSource::Methodology => Ok(self.from_methodology(query)),
            RateSource::ConfigByKeys => self.from_config_keys(query),
            RateSource::ConfigScan => self.from_config_scan(query),
        }
    }

    fn from_methodology(&self, query: &RateQuery<'_>) -> Option<Decimal> {
        let entry =
            self.methodology
                .lookup(query.operation, query.duty, query.category().bucket())?;

        basic_machine_hour_rate(
            &self.policy,
            entry.investment_cost,
            entry.power_rating_kw,
            entry.available_hours,
            entry.downtime_rate,
        )
    }

    fn from_config_keys(&self, query: &RateQuery<'_>) -> Result<Option<Decimal>, LookupError> {
        let Some(operation_id) = self
            .catalog
            .find_operation_id_by_name(query.operation.as_str())?
        else {
            return Ok(None);
        };
        let Some(duty_id) = self
            .catalog
            .find_duty_id_by_name(&normalize_name(query.duty.as_str()))?
        else {
            return Ok(None);
        };
        let Some(machine) = self.catalog.find_machine_by_name(query.machine_name)? else {
            return Ok(None);
        };

        let record = self
            .catalog
            .find_mhr_config(operation_id, duty_id, machine.id)?;
        Ok(record.and_then(|r| self.rate_from_record(&r, query.category())))
    }

    fn from_config_scan(&self, query: &RateQuery<'_>) -> Result<Option<Decimal>, LookupError> {
        let operation_key = normalize_name(query.operation.as_str());
        let duty_key = normalize_name(query.duty.as_str());
        let machine_key = normalize_name(query.machine_name);

        let candidates = self
            .catalog
            .scan_mhr_config_by_operation_duty(query.operation.as_str(), query.duty.as_str())?;

        let mut best: Option<(&MhrConfigRecord, u8)> = None;
        for record in candidates.iter().filter(|r| {
            normalize_name(&r.operation_name) == operation_key
                && normalize_name(&r.duty_name) == duty_key
        }) {
            let score = machine_match_score(&normalize_name(&record.machine_name), &machine_key);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((record, score));
            }
            if score == 2 {
                break;
            }
        }

        Ok(best.and_then(|(record, score)| {
            tracing::debug!(
                "掃描選中配置 #{} (機台 '{}', 分數 {})",
                record.id,
                record.machine_name,
                score
            );
            self.rate_from_record(record, query.category())
        }))
    }

    /// 先以成本驅動因子計算，無法計算時才用預存費率
    fn rate_from_record(
        &self,
        record: &MhrConfigRecord,
        category: MachineCategory,
    ) -> Option<Decimal> {
        let computed = match (record.investment_cost_value(), record.power_rating_value()) {
            (Some(investment_cost), Some(power_rating_kw)) => {
                let available_hours = record
                    .available_hours_value()
                    .filter(|hours| *hours > Decimal::ZERO)
                    .unwrap_or(self.policy.annual_working_hours);
                basic_machine_hour_rate(
                    &self.policy,
                    investment_cost,
                    power_rating_kw,
                    available_hours,
                    self.policy.downtime_rate(category),
                )
            }
            _ => None,
        };

        computed.or_else(|| record.machine_hr_rate_value())
    }
}

/// 機台名稱比對分數：2 完全相同，1 互為子字串，0 無關
fn machine_match_score(record_machine: &str, requested: &str) -> u8 {
    if record_machine == requested {
        2
    } else if !record_machine.is_empty()
        && !requested.is_empty()
        && (record_machine.contains(requested) || requested.contains(record_machine))
    {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costing_core::breakdown::round_currency;
    use costing_core::{InMemoryCatalog, MachineRecord};
    use rstest::rstest;

    /// 所有查詢皆失敗的參考資料
    struct UnavailableCatalog;

    impl ReferenceCatalog for UnavailableCatalog {
        fn find_machine_by_name(&self, _: &str) -> Result<Option<MachineRecord>, LookupError> {
            Err(LookupError::Unavailable("connection refused".into()))
        }
        fn find_operation_id_by_name(&self, _: &str) -> Result<Option<i64>, LookupError> {
            Err(LookupError::Unavailable("connection refused".into()))
        }
        fn find_duty_id_by_name(&self, _: &str) -> Result<Option<i64>, LookupError> {
            Err(LookupError::Unavailable("connection refused".into()))
        }
        fn find_mhr_config(
            &self,
            _: i64,
            _: i64,
            _: i64,
        ) -> Result<Option<MhrConfigRecord>, LookupError> {
            Err(LookupError::Unavailable("connection refused".into()))
        }
        fn scan_mhr_config_by_operation_duty(
            &self,
            _: &str,
            _: &str,
        ) -> Result<Vec<MhrConfigRecord>, LookupError> {
            Err(LookupError::Unavailable("connection refused".into()))
        }
    }

    /// 精確查詢壞掉、掃描正常
    struct BrokenKeysCatalog(InMemoryCatalog);

    impl ReferenceCatalog for BrokenKeysCatalog {
        fn find_machine_by_name(&self, name: &str) -> Result<Option<MachineRecord>, LookupError> {
            self.0.find_machine_by_name(name)
        }
        fn find_operation_id_by_name(&self, name: &str) -> Result<Option<i64>, LookupError> {
            self.0.find_operation_id_by_name(name)
        }
        fn find_duty_id_by_name(&self, name: &str) -> Result<Option<i64>, LookupError> {
            self.0.find_duty_id_by_name(name)
        }
        fn find_mhr_config(
            &self,
            _: i64,
            _: i64,
            _: i64,
        ) -> Result<Option<MhrConfigRecord>, LookupError> {
            Err(LookupError::Malformed("duplicate config rows".into()))
        }
        fn scan_mhr_config_by_operation_duty(
            &self,
            operation_name: &str,
            duty_name: &str,
        ) -> Result<Vec<MhrConfigRecord>, LookupError> {
            self.0
                .scan_mhr_config_by_operation_duty(operation_name, duty_name)
        }
    }

    fn resolver(catalog: impl ReferenceCatalog + 'static) -> MachineHourRateResolver {
        MachineHourRateResolver::new(Arc::new(catalog), CostPolicy::default())
    }

    fn drilling_catalog(record: MhrConfigRecord) -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_operation(3, "Drilling")
            .with_duty(1, "Light duty")
            .with_machine(MachineRecord::new(20, "CNC Drilling Machine"))
            .with_mhr_config(record)
    }

    fn drilling_record(id: i64, machine: (i64, &str)) -> MhrConfigRecord {
        MhrConfigRecord::new(id, (3, "Drilling"), (1, "Light duty"), machine)
    }

    #[test]
    fn test_methodology_scenario() {
        let resolver = resolver(InMemoryCatalog::new());
        let query = RateQuery::new(&Operation::Turning, DutyCategory::Medium, "CNC Lathe");

        let resolved = resolver.resolve(&query).unwrap();
        assert_eq!(resolved.source, RateSource::Methodology);
        assert_eq!(round_currency(resolved.rate), Decimal::new(36912, 2));
    }

    #[test]
    fn test_methodology_wins_over_conflicting_config() {
        let catalog = InMemoryCatalog::new()
            .with_operation(1, "Turning")
            .with_duty(2, "Medium duty")
            .with_machine(MachineRecord::new(7, "CNC Lathe"))
            .with_mhr_config(
                MhrConfigRecord::new(1, (1, "Turning"), (2, "Medium duty"), (7, "CNC Lathe"))
                    .with_machine_hr_rate("999"),
            );
        let resolver = resolver(catalog);
        let query = RateQuery::new(&Operation::Turning, DutyCategory::Medium, "CNC Lathe");

        let resolved = resolver.resolve(&query).unwrap();
        assert_eq!(resolved.source, RateSource::Methodology);
        assert_ne!(resolved.rate, Decimal::from(999));
    }

    #[test]
    fn test_config_by_keys_from_cost_drivers() {
        // 300000 / (2000 × 0.85) + 10 × 5 = 226.47
        let record = drilling_record(1, (20, "CNC Drilling Machine")).with_cost_drivers(
            "3000000",
            "10",
            Some("2000"),
        );
        let resolver = resolver(drilling_catalog(record));
        let query = RateQuery::new(&Operation::Drilling, DutyCategory::Light, "CNC Drilling Machine");

        let resolved = resolver.resolve(&query).unwrap();
        assert_eq!(resolved.source, RateSource::ConfigByKeys);
        assert_eq!(round_currency(resolved.rate), Decimal::new(22647, 2));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("0"))]
    #[case(Some("unknown"))]
    fn test_config_hours_default_to_standard(#[case] hours: Option<&str>) {
        // 408000 / 2040 + 50 = 250
        let record = drilling_record(1, (20, "CNC Drilling Machine"))
            .with_cost_drivers("4080000", "10", hours);
        let resolver = resolver(drilling_catalog(record));
        let query = RateQuery::new(&Operation::Drilling, DutyCategory::Light, "CNC Drilling Machine");

        assert_eq!(resolver.resolve(&query).unwrap().rate, Decimal::from(250));
    }

    #[test]
    fn test_config_literal_rate_when_drivers_unparsable() {
        let record = drilling_record(1, (20, "CNC Drilling Machine"))
            .with_cost_drivers("TBD", "10", None)
            .with_machine_hr_rate("450.5");
        let resolver = resolver(drilling_catalog(record));
        let query = RateQuery::new(&Operation::Drilling, DutyCategory::Light, "CNC Drilling Machine");

        let resolved = resolver.resolve(&query).unwrap();
        assert_eq!(resolved.source, RateSource::ConfigByKeys);
        assert_eq!(resolved.rate, Decimal::new(4505, 1));
    }

    #[test]
    fn test_scan_prefers_exact_machine_name() {
        let catalog = InMemoryCatalog::new()
            .with_mhr_config(
                drilling_record(1, (21, "CNC Drilling Machine Mk2")).with_machine_hr_rate("300"),
            )
            .with_mhr_config(
                drilling_record(2, (22, "cnc drilling machine")).with_machine_hr_rate("200"),
            );
        let resolver = resolver(catalog);
        let query = RateQuery::new(&Operation::Drilling, DutyCategory::Light, "CNC Drilling Machine");

        let resolved = resolver.resolve(&query).unwrap();
        assert_eq!(resolved.source, RateSource::ConfigScan);
        assert_eq!(resolved.rate, Decimal::from(200));
    }

    #[test]
    fn test_scan_substring_beats_unrelated() {
        let catalog = InMemoryCatalog::new()
            .with_mhr_config(
                drilling_record(1, (21, "Conventional Drill Press")).with_machine_hr_rate("120"),
            )
            .with_mhr_config(drilling_record(2, (22, "CNC Drilling")).with_machine_hr_rate("210"));
        let resolver = resolver(catalog);
        let query = RateQuery::new(&Operation::Drilling, DutyCategory::Light, "CNC Drilling Machine");

        assert_eq!(resolver.resolve(&query).unwrap().rate, Decimal::from(210));
    }

    #[test]
    fn test_scan_accepts_unrelated_machine_when_alone() {
        let catalog = InMemoryCatalog::new().with_mhr_config(
            drilling_record(1, (21, "Radial Drill")).with_machine_hr_rate("120"),
        );
        let resolver = resolver(catalog);
        let query = RateQuery::new(&Operation::Drilling, DutyCategory::Light, "CNC Drilling Machine");

        assert_eq!(resolver.resolve(&query).unwrap().rate, Decimal::from(120));
    }

    #[test]
    fn test_scan_normalizes_operation_and_duty_names() {
        let catalog = InMemoryCatalog::new().with_mhr_config(
            MhrConfigRecord::new(1, (5, "Heat Treatment"), (3, "Heavy-Duty"), (9, "Furnace"))
                .with_machine_hr_rate("640"),
        );
        let resolver = resolver(catalog);
        let query = RateQuery::new(&Operation::HeatTreatment, DutyCategory::Heavy, "Furnace");

        let resolved = resolver.resolve(&query).unwrap();
        assert_eq!(resolved.source, RateSource::ConfigScan);
        assert_eq!(resolved.rate, Decimal::from(640));
    }

    #[test]
    fn test_fault_in_keys_tier_falls_through_to_scan() {
        let record = drilling_record(1, (20, "CNC Drilling Machine")).with_machine_hr_rate("333");
        let resolver = resolver(BrokenKeysCatalog(drilling_catalog(record)));
        let query = RateQuery::new(&Operation::Drilling, DutyCategory::Light, "CNC Drilling Machine");

        let resolved = resolver.resolve(&query).unwrap();
        assert_eq!(resolved.source, RateSource::ConfigScan);
        assert_eq!(resolved.rate, Decimal::from(333));
    }

    #[test]
    fn test_unavailable_catalog_is_unresolved() {
        let resolver = resolver(UnavailableCatalog);
        let query = RateQuery::new(&Operation::Drilling, DutyCategory::Light, "CNC Drilling Machine");

        let err = resolver.resolve(&query).unwrap_err();
        assert_eq!(
            err,
            CostError::UnresolvedRate {
                operation: "drilling".into(),
                duty: "light".into(),
                machine: "CNC Drilling Machine".into(),
            }
        );
    }

    #[test]
    fn test_methodology_does_not_touch_catalog() {
        let resolver = resolver(UnavailableCatalog);
        let query = RateQuery::new(&Operation::Turning, DutyCategory::Medium, "CNC Lathe");

        assert_eq!(
            resolver.resolve(&query).unwrap().source,
            RateSource::Methodology
        );
    }

    #[rstest]
    // (300000 / 2040 + 100) × 1.05
    #[case("CNC Drilling Machine", Decimal::new(25941, 2))]
    // (100000 / 2232 + 75) × 1.05
    #[case("Radial Drill", Decimal::new(12579, 2))]
    // (500000 / 2040 + 125) × 1.05
    #[case("Special Purpose Drill", Decimal::new(38860, 2))]
    fn test_fallback_applies_maintenance(#[case] machine: &str, #[case] expected: Decimal) {
        let resolver = resolver(UnavailableCatalog);
        let query = RateQuery::new(&Operation::Drilling, DutyCategory::Light, machine);

        let rate = resolver.resolve_with_fallback(&query);
        assert_eq!(round_currency(rate), expected);
    }

    #[test]
    fn test_fallback_not_used_when_resolved() {
        let resolver = resolver(UnavailableCatalog);
        let query = RateQuery::new(&Operation::Turning, DutyCategory::Medium, "CNC Lathe");

        assert_eq!(
            resolver.resolve_with_fallback(&query),
            resolver.resolve(&query).unwrap().rate
        );
    }

    #[test]
    fn test_complete_machine_hour_rate() {
        let policy = CostPolicy::default();
        let breakdown = complete_machine_hour_rate(
            &policy,
            Decimal::from(1_000_000),
            Decimal::from(15),
            MachineCategory::Conventional,
            None,
        )
        .unwrap()
        .rounded();

        assert_eq!(breakdown.available_hours_per_annum, Decimal::from(2400));
        assert_eq!(breakdown.downtime_hours, Decimal::from(168));
        assert_eq!(breakdown.utilization_hours, Decimal::from(2232));
        assert_eq!(breakdown.power_charges, Decimal::from(75));
        assert_eq!(breakdown.depreciation_per_hour, Decimal::new(4480, 2));
        assert_eq!(breakdown.machine_utilization_cost, Decimal::new(11980, 2));
        assert_eq!(breakdown.machine_hour_rate, Decimal::new(12579, 2));
    }

    #[test]
    fn test_basic_rate_rejects_zero_utilization() {
        let policy = CostPolicy::default();
        assert!(basic_machine_hour_rate(
            &policy,
            Decimal::from(1_000_000),
            Decimal::from(10),
            Decimal::ZERO,
            Decimal::new(15, 2),
        )
        .is_none());
    }

    #[test]
    fn test_complete_rate_overflow_is_none() {
        let policy = CostPolicy::default();
        assert!(complete_machine_hour_rate(
            &policy,
            Decimal::from(1_000_000),
            Decimal::MAX,
            MachineCategory::Cnc3Axis,
            None,
        )
        .is_none());
    }

    #[test]
    fn test_basic_rate_overflow_is_none() {
        let policy = CostPolicy::default();
        assert!(basic_machine_hour_rate(
            &policy,
            Decimal::from(1_000_000),
            Decimal::from_str_exact("20000000000000000000000000000").unwrap(),
            Decimal::from(2400),
            Decimal::new(15, 2),
        )
        .is_none());
    }

    #[test]
    fn test_oversized_drivers_fall_back_to_stored_rate() {
        let record = drilling_record(1, (20, "CNC Drilling Machine"))
            .with_cost_drivers("3000000", "20000000000000000000000000000", Some("2000"))
            .with_machine_hr_rate("275");
        let resolver = resolver(drilling_catalog(record));
        let query = RateQuery::new(&Operation::Drilling, DutyCategory::Light, "CNC Drilling Machine");

        let resolved = resolver.resolve(&query).unwrap();
        assert_eq!(resolved.source, RateSource::ConfigByKeys);
        assert_eq!(resolved.rate, Decimal::from(275));
    }

    #[test]
    fn test_oversized_drivers_without_stored_rate_are_unresolved() {
        let record = drilling_record(1, (20, "CNC Drilling Machine")).with_cost_drivers(
            "3000000",
            "79228162514264337593543950335",
            Some("2000"),
        );
        let resolver = resolver(drilling_catalog(record));
        let query = RateQuery::new(&Operation::Drilling, DutyCategory::Light, "CNC Drilling Machine");

        assert!(matches!(
            resolver.resolve(&query),
            Err(CostError::UnresolvedRate { .. })
        ));
        // 保底費率照常計算
        assert_eq!(
            round_currency(resolver.resolve_with_fallback(&query)),
            Decimal::new(25941, 2)
        );
    }

    #[rstest]
    #[case("cnc lathe", "cnc lathe", 2)]
    #[case("cnc lathe", "cnc lathe 2", 1)]
    #[case("conventional lathe", "lathe", 1)]
    #[case("cnc mill", "lathe", 0)]
    #[case("", "lathe", 0)]
    fn test_machine_match_score(#[case] record: &str, #[case] requested: &str, #[case] expected: u8) {
        assert_eq!(machine_match_score(record, requested), expected);
    }
}
