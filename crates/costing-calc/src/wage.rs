//! 工資率查詢

use costing_core::{CostPolicy, MachineCategory};
use rust_decimal::Decimal;

/// 工資率查詢
pub struct WageRateLookup;

impl WageRateLookup {
    /// C = 月薪 / 每月標準工時
    pub fn hourly_rate(policy: &CostPolicy, category: MachineCategory) -> Decimal {
        policy.monthly_wage(category) / policy.wage_hours_per_month
    }

    /// 依機台名稱推導類別後查詢
    pub fn for_machine_name(policy: &CostPolicy, machine_name: &str) -> Decimal {
        Self::hourly_rate(policy, MachineCategory::from_machine_name(machine_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MachineCategory::Conventional, 75)]
    #[case(MachineCategory::Cnc3Axis, 100)]
    #[case(MachineCategory::Cnc5Axis, 100)]
    #[case(MachineCategory::Spm, 100)]
    fn test_hourly_rate(#[case] category: MachineCategory, #[case] expected: i64) {
        let rate = WageRateLookup::hourly_rate(&CostPolicy::default(), category);
        assert_eq!(rate, Decimal::from(expected));
    }

    #[test]
    fn test_rate_from_machine_name() {
        let policy = CostPolicy::default();
        assert_eq!(
            WageRateLookup::for_machine_name(&policy, "Conventional Lathe"),
            Decimal::from(75)
        );
        assert_eq!(
            WageRateLookup::for_machine_name(&policy, "Precision Grinder"),
            Decimal::from(100)
        );
    }

    #[test]
    fn test_custom_wages() {
        let policy = CostPolicy::default()
            .with_monthly_wages(Decimal::from(16_000), Decimal::from(30_000));
        assert_eq!(
            WageRateLookup::hourly_rate(&policy, MachineCategory::Conventional),
            Decimal::from(80)
        );
        assert_eq!(
            WageRateLookup::hourly_rate(&policy, MachineCategory::Cnc3Axis),
            Decimal::from(150)
        );
    }
}
