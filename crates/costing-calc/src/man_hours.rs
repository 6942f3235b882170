//! 標準工時矩陣

use costing_core::{DutyCategory, Operation};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// (工序, 每件工時 light/medium/heavy，單位 0.01 小時)
const STANDARD_MAN_HOURS: &[(&str, [i64; 3])] = &[
    ("turning", [25, 50, 100]),
    ("milling", [50, 100, 200]),
    ("drilling", [15, 30, 60]),
    ("grinding", [30, 60, 120]),
    ("boring", [40, 80, 150]),
    ("heat_treatment", [50, 100, 200]),
    ("welding", [30, 60, 120]),
    ("surface_treatment", [20, 40, 80]),
];

/// 工序 × 負荷 → 每件工時
#[derive(Debug, Clone)]
pub struct ManHoursMatrix {
    hours: HashMap<(Operation, DutyCategory), Decimal>,
    default_hours: Decimal,
}

impl ManHoursMatrix {
    /// 標準矩陣，查無資料時使用 `default_hours`
    pub fn standard(default_hours: Decimal) -> Self {
        let mut hours = HashMap::new();
        for (operation, per_duty) in STANDARD_MAN_HOURS {
            let operation = Operation::from(*operation);
            for (duty, centi_hours) in DutyCategory::ALL.iter().zip(per_duty) {
                hours.insert((operation.clone(), *duty), Decimal::new(*centi_hours, 2));
            }
        }

        Self {
            hours,
            default_hours,
        }
    }

    /// 查詢工時；指定的正值覆寫優先
    pub fn man_hours(
        &self,
        operation: &Operation,
        duty: DutyCategory,
        override_hours: Option<Decimal>,
    ) -> Decimal {
        if let Some(hours) = override_hours.filter(|h| *h > Decimal::ZERO) {
            return hours;
        }

        self.hours
            .get(&(operation.clone(), duty))
            .copied()
            .unwrap_or(self.default_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn matrix() -> ManHoursMatrix {
        ManHoursMatrix::standard(Decimal::new(5, 1))
    }

    #[rstest]
    #[case(Operation::Turning, DutyCategory::Light, Decimal::new(25, 2))]
    #[case(Operation::Milling, DutyCategory::Heavy, Decimal::from(2))]
    #[case(Operation::Boring, DutyCategory::Heavy, Decimal::new(15, 1))]
    #[case(Operation::SurfaceTreatment, DutyCategory::Medium, Decimal::new(4, 1))]
    #[case(Operation::Other("lapping".into()), DutyCategory::Heavy, Decimal::new(5, 1))]
    fn test_lookup(
        #[case] operation: Operation,
        #[case] duty: DutyCategory,
        #[case] expected: Decimal,
    ) {
        assert_eq!(matrix().man_hours(&operation, duty, None), expected);
    }

    #[test]
    fn test_positive_override_wins() {
        let hours = matrix().man_hours(&Operation::Turning, DutyCategory::Light, Some(Decimal::from(3)));
        assert_eq!(hours, Decimal::from(3));
    }

    #[test]
    fn test_non_positive_override_ignored() {
        let hours = matrix().man_hours(&Operation::Turning, DutyCategory::Light, Some(Decimal::ZERO));
        assert_eq!(hours, Decimal::new(25, 2));
    }
}
