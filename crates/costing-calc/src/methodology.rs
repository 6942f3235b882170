//! 方法論費率表（機時費率第一層來源）

use costing_core::{CategoryBucket, CostPolicy, DutyCategory, Operation};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 方法論表項目：預設成本驅動因子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodologyEntry {
    pub investment_cost: Decimal,
    pub power_rating_kw: Decimal,
    pub available_hours: Decimal,
    pub downtime_rate: Decimal,
}

/// 傳統機台列的年可用時數
const CONVENTIONAL_AVAILABLE_HOURS: i64 = 3600;

/// (工序, 負荷, 投資額 傳統/CNC, kW 傳統/CNC)
const STANDARD_ROWS: &[(&str, DutyCategory, (i64, i64), (i64, i64))] = &[
    ("turning", DutyCategory::Light, (2_000_000, 5_000_000), (5, 12)),
    ("turning", DutyCategory::Medium, (3_000_000, 6_000_000), (8, 15)),
    ("turning", DutyCategory::Heavy, (5_000_000, 10_000_000), (12, 20)),
    ("milling", DutyCategory::Light, (3_000_000, 6_000_000), (8, 15)),
    ("milling", DutyCategory::Medium, (5_000_000, 7_000_000), (10, 20)),
    ("milling", DutyCategory::Heavy, (6_000_000, 12_000_000), (15, 30)),
];

type MethodologyKey = (Operation, DutyCategory, CategoryBucket);

/// 不可變的方法論費率表，引擎建立時產生一次
#[derive(Debug, Clone)]
pub struct MethodologyTable {
    entries: HashMap<MethodologyKey, MethodologyEntry>,
}

impl MethodologyTable {
    /// 空表（所有查詢落到下一層）
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 標準費率表；停機率取自政策，CNC 列的可用時數為政策的標準年工作時數
    pub fn standard(policy: &CostPolicy) -> Self {
        let mut table = Self::empty();

        for (operation, duty, (conv_inv, cnc_inv), (conv_kw, cnc_kw)) in STANDARD_ROWS {
            let operation = Operation::from(*operation);
            table.insert(
                operation.clone(),
                *duty,
                CategoryBucket::Conventional,
                MethodologyEntry {
                    investment_cost: Decimal::from(*conv_inv),
                    power_rating_kw: Decimal::from(*conv_kw),
                    available_hours: Decimal::from(CONVENTIONAL_AVAILABLE_HOURS),
                    downtime_rate: policy.conventional_downtime_rate,
                },
            );
            table.insert(
                operation,
                *duty,
                CategoryBucket::Cnc,
                MethodologyEntry {
                    investment_cost: Decimal::from(*cnc_inv),
                    power_rating_kw: Decimal::from(*cnc_kw),
                    available_hours: policy.annual_working_hours,
                    downtime_rate: policy.cnc_downtime_rate,
                },
            );
        }

        table
    }

    /// 加入或覆寫一列
    pub fn insert(
        &mut self,
        operation: Operation,
        duty: DutyCategory,
        bucket: CategoryBucket,
        entry: MethodologyEntry,
    ) {
        self.entries.insert((operation, duty, bucket), entry);
    }

    /// 精確查詢；專用機未單獨列表時沿用傳統機台列
    pub fn lookup(
        &self,
        operation: &Operation,
        duty: DutyCategory,
        bucket: CategoryBucket,
    ) -> Option<&MethodologyEntry> {
        let key = (operation.clone(), duty, bucket);
        self.entries.get(&key).or_else(|| match bucket {
            CategoryBucket::Spm => self.entries.get(&(
                operation.clone(),
                duty,
                CategoryBucket::Conventional,
            )),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_covers_turning_and_milling() {
        let table = MethodologyTable::standard(&CostPolicy::default());
        assert_eq!(table.len(), 12);

        let entry = table
            .lookup(&Operation::Turning, DutyCategory::Medium, CategoryBucket::Cnc)
            .unwrap();
        assert_eq!(entry.investment_cost, Decimal::from(6_000_000));
        assert_eq!(entry.power_rating_kw, Decimal::from(15));
        assert_eq!(entry.available_hours, Decimal::from(2400));
        assert_eq!(entry.downtime_rate, Decimal::new(15, 2));
    }

    #[test]
    fn test_conventional_rows() {
        let table = MethodologyTable::standard(&CostPolicy::default());
        let entry = table
            .lookup(&Operation::Milling, DutyCategory::Heavy, CategoryBucket::Conventional)
            .unwrap();

        assert_eq!(entry.investment_cost, Decimal::from(6_000_000));
        assert_eq!(entry.available_hours, Decimal::from(3600));
        assert_eq!(entry.downtime_rate, Decimal::new(7, 2));
    }

    #[test]
    fn test_spm_falls_back_to_conventional_row() {
        let table = MethodologyTable::standard(&CostPolicy::default());
        let spm = table.lookup(&Operation::Turning, DutyCategory::Light, CategoryBucket::Spm);
        let conventional = table.lookup(
            &Operation::Turning,
            DutyCategory::Light,
            CategoryBucket::Conventional,
        );
        assert_eq!(spm, conventional);
        assert!(spm.is_some());
    }

    #[test]
    fn test_untabulated_operation_misses() {
        let table = MethodologyTable::standard(&CostPolicy::default());
        assert!(table
            .lookup(&Operation::Drilling, DutyCategory::Light, CategoryBucket::Cnc)
            .is_none());
    }

    #[test]
    fn test_policy_drives_downtime() {
        let policy = CostPolicy::default().with_downtime_rates(Decimal::new(5, 2), Decimal::new(1, 1));
        let table = MethodologyTable::standard(&policy);
        let entry = table
            .lookup(&Operation::Turning, DutyCategory::Heavy, CategoryBucket::Cnc)
            .unwrap();
        assert_eq!(entry.downtime_rate, Decimal::new(1, 1));
    }
}
