//! 成本估算引擎

use costing_core::breakdown::round_to;
use costing_core::{
    AggregateCostBreakdown, CostError, CostPolicy, Dimensions, DutyCategory, MachineCategory,
    MachineRecord, Material, MaterialCostRecord, MhrBreakdown, NrcRecord, Operation,
    QuickEstimate, ReferenceCatalog, UnitCostEstimate,
};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::aggregator::{CostAggregator, OperationCost};
use crate::duty::DutyClassifier;
use crate::geometry::GeometryResolver;
use crate::man_hours::ManHoursMatrix;
use crate::material_cost::{MaterialCostCalculator, MaterialCostInput};
use crate::mhr::{self, MachineHourRateResolver, RateQuery};
use crate::nrc::{NrcAmortizer, NrcInput};
use crate::selector::MachineSelector;
use crate::wage::WageRateLookup;

/// 單件成本估算請求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub material: Material,
    pub operation: Operation,
    pub dimensions: Dimensions,

    /// A - 每件工時
    pub man_hours: Decimal,

    /// 指定機台；未指定時自動選擇
    #[serde(default)]
    pub machine_name: Option<String>,

    /// 自動選擇時偏好的機台類別
    #[serde(default)]
    pub machine_category: Option<MachineCategory>,

    /// 指定負荷（略過負荷判定）
    #[serde(default)]
    pub duty_override: Option<DutyCategory>,

    #[serde(default)]
    pub miscellaneous_amount: Decimal,
}

impl EstimateRequest {
    pub fn new(
        material: Material,
        operation: Operation,
        dimensions: Dimensions,
        man_hours: Decimal,
    ) -> Self {
        Self {
            material,
            operation,
            dimensions,
            man_hours,
            machine_name: None,
            machine_category: None,
            duty_override: None,
            miscellaneous_amount: Decimal::ZERO,
        }
    }

    /// 建構器模式：指定機台
    pub fn with_machine(mut self, name: impl Into<String>) -> Self {
        self.machine_name = Some(name.into());
        self
    }

    /// 建構器模式：偏好的機台類別
    pub fn with_machine_category(mut self, category: MachineCategory) -> Self {
        self.machine_category = Some(category);
        self
    }

    /// 建構器模式：指定負荷
    pub fn with_duty(mut self, duty: DutyCategory) -> Self {
        self.duty_override = Some(duty);
        self
    }

    /// 建構器模式：雜項金額
    pub fn with_miscellaneous(mut self, amount: Decimal) -> Self {
        self.miscellaneous_amount = amount;
        self
    }

    /// 工時與雜項檢查（尺寸由幾何解析檢查）
    fn validate(&self) -> costing_core::Result<()> {
        if self.man_hours <= Decimal::ZERO {
            return Err(CostError::validation(
                self.operation.as_str(),
                &["man_hours"],
                "每件工時必須大於 0",
            ));
        }
        if self.miscellaneous_amount < Decimal::ZERO {
            return Err(CostError::validation(
                self.operation.as_str(),
                &["miscellaneous_amount"],
                "雜項金額不可為負數",
            ));
        }
        Ok(())
    }
}

/// 成本估算引擎
///
/// 建立後只持有唯讀資料（政策、方法論費率表、工時矩陣、參考資料），
/// 可在多執行緒間共用。
pub struct CostEngine {
    /// 參考資料（外部唯讀）
    catalog: Arc<dyn ReferenceCatalog>,

    /// 成本政策
    policy: CostPolicy,

    /// 機時費率解析器
    resolver: MachineHourRateResolver,

    /// 標準工時矩陣
    man_hours: ManHoursMatrix,
}

impl CostEngine {
    /// 創建新的估算引擎
    pub fn new(
        catalog: Arc<dyn ReferenceCatalog>,
        policy: CostPolicy,
    ) -> costing_core::Result<Self> {
        policy.validate()?;
        Ok(Self::build(catalog, policy))
    }

    /// 使用預設成本政策
    pub fn with_defaults(catalog: Arc<dyn ReferenceCatalog>) -> Self {
        Self::build(catalog, CostPolicy::default())
    }

    /// 政策須已驗證
    fn build(catalog: Arc<dyn ReferenceCatalog>, policy: CostPolicy) -> Self {
        let resolver = MachineHourRateResolver::new(Arc::clone(&catalog), policy.clone());
        let man_hours = ManHoursMatrix::standard(policy.default_man_hours);

        Self {
            catalog,
            policy,
            resolver,
            man_hours,
        }
    }

    pub fn policy(&self) -> &CostPolicy {
        &self.policy
    }

    /// 單工序單件成本估算
    pub fn estimate_unit_cost(
        &self,
        request: &EstimateRequest,
    ) -> costing_core::Result<UnitCostEstimate> {
        tracing::info!(
            "開始單件成本估算: 工序 {}, 材料 {}",
            request.operation,
            request.material
        );

        // Step 1: 輸入檢查與幾何解析
        request.validate()?;
        let geometry = GeometryResolver::resolve(&request.operation, &request.dimensions)?;
        tracing::debug!(
            "Step 1: 外形 {}, 體積 {} mm³",
            geometry.shape,
            geometry.volume_mm3
        );

        // Step 2: 負荷判定
        let duty = match request.duty_override {
            Some(duty) => duty,
            None => DutyClassifier::classify_geometry(
                &geometry.geometry,
                &request.material,
                &request.operation,
            ),
        };
        tracing::debug!("Step 2: 負荷 {}", duty);

        // Step 3: 機台
        let machine_name = match &request.machine_name {
            Some(name) => name.clone(),
            None => {
                MachineSelector::select(
                    &request.operation,
                    duty,
                    &request.material,
                    request.machine_category,
                )
                .name
            }
        };
        let machine = self.find_machine(&machine_name)?;
        let machine_category = MachineCategory::from_machine_name(&machine.name);
        tracing::debug!("Step 3: 機台 '{}' ({})", machine.name, machine_category);

        // Step 4: B - 機時費率
        let machine_hour_rate = self.resolver.resolve_with_fallback(&RateQuery::new(
            &request.operation,
            duty,
            &machine.name,
        ));
        tracing::debug!("Step 4: 機時費率 B = {}", machine_hour_rate);

        // Step 5: C - 工資率
        let wage_rate = WageRateLookup::for_machine_name(&self.policy, &machine.name);
        tracing::debug!("Step 5: 工資率 C = {}", wage_rate);

        // Step 6: 成本彙總（單件）
        let components = CostAggregator::single(
            &self.policy,
            request.man_hours,
            machine_hour_rate,
            wage_rate,
            1,
            request.miscellaneous_amount,
        )?;
        let cost_breakdown = components.to_breakdown();
        let calculation_steps = components.calculation_steps(&self.policy);

        tracing::info!(
            "單件成本估算完成: 單價 {}, 含雜項 {}",
            cost_breakdown.unit_cost,
            cost_breakdown.total_unit_cost_with_misc
        );

        Ok(UnitCostEstimate {
            duty,
            machine,
            machine_category,
            shape: geometry.shape,
            dimensions: geometry.geometry.to_dimensions(),
            volume_mm3: round_to(geometry.volume_mm3, 2),
            material: request.material.clone(),
            operation: request.operation.clone(),
            cost_breakdown,
            calculation_steps,
        })
    }

    /// 批次估算，各請求獨立平行計算，結果依輸入順序
    pub fn estimate_batch(
        &self,
        requests: &[EstimateRequest],
    ) -> Vec<costing_core::Result<UnitCostEstimate>> {
        tracing::info!("開始批次估算: {} 筆", requests.len());

        let results: Vec<_> = requests
            .par_iter()
            .map(|request| self.estimate_unit_cost(request))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!("批次估算完成: 成功 {}, 失敗 {}", results.len() - failed, failed);
        results
    }

    /// 快速估算：材料視為鋼材，工時取標準矩陣
    pub fn quick_estimate(
        &self,
        operation: &Operation,
        duty: DutyCategory,
        quantity: u32,
    ) -> costing_core::Result<QuickEstimate> {
        tracing::info!(
            "快速估算: 工序 {}, 負荷 {}, 數量 {}",
            operation,
            duty,
            quantity
        );

        let selection = MachineSelector::select(operation, duty, &Material::Steel, None);
        self.find_machine(&selection.name)?;

        let machine_hour_rate = self.resolve_machine_hour_rate_with_fallback(
            operation,
            duty,
            &selection.name,
        );
        let wage_rate = self.wage_rate(&selection.name);
        let man_hours = self.man_hours(operation, duty, None);

        let cost_breakdown = CostAggregator::single(
            &self.policy,
            man_hours,
            machine_hour_rate,
            wage_rate,
            quantity,
            Decimal::ZERO,
        )?
        .to_breakdown();

        tracing::info!(
            "快速估算完成: 單價 {}, 總價 {}",
            cost_breakdown.unit_cost,
            cost_breakdown.total_cost
        );

        Ok(QuickEstimate {
            machine_name: selection.name,
            machine_category: selection.category,
            operation: operation.clone(),
            duty,
            quantity,
            cost_breakdown,
        })
    }

    /// 機時費率（無保底，全部來源落空時回傳錯誤）
    pub fn resolve_machine_hour_rate(
        &self,
        operation: &Operation,
        duty: DutyCategory,
        machine_name: &str,
    ) -> costing_core::Result<Decimal> {
        self.resolver
            .resolve(&RateQuery::new(operation, duty, machine_name))
            .map(|resolved| resolved.rate)
    }

    /// 機時費率（含類別保底，不會失敗）
    pub fn resolve_machine_hour_rate_with_fallback(
        &self,
        operation: &Operation,
        duty: DutyCategory,
        machine_name: &str,
    ) -> Decimal {
        self.resolver
            .resolve_with_fallback(&RateQuery::new(operation, duty, machine_name))
    }

    /// 完整機時費率明細（含維護費，已捨入）
    pub fn complete_machine_hour_rate(
        &self,
        investment_cost: Decimal,
        power_rating_kw: Decimal,
        category: MachineCategory,
        available_hours: Option<Decimal>,
    ) -> costing_core::Result<MhrBreakdown> {
        mhr::complete_machine_hour_rate(
            &self.policy,
            investment_cost,
            power_rating_kw,
            category,
            available_hours,
        )
        .map(|breakdown| breakdown.rounded())
        .ok_or_else(|| {
            CostError::validation(
                "machine_hour_rate",
                &["investment_cost", "power_rating_kw", "available_hours"],
                "機時費率超出可計算範圍",
            )
        })
    }

    pub fn amortize_nrc(&self, input: &NrcInput) -> costing_core::Result<NrcRecord> {
        NrcAmortizer::amortize(input)
    }

    pub fn cost_material(&self, input: &MaterialCostInput) -> costing_core::Result<MaterialCostRecord> {
        MaterialCostCalculator::calculate(input)
    }

    /// 多工序彙總；NRC 與材料費以捨入後的每件金額併入
    pub fn estimate_multi_operation(
        &self,
        operations: &[OperationCost],
        quantity: u32,
        miscellaneous_amount: Decimal,
        nrc: Option<&NrcInput>,
        material: Option<&MaterialCostInput>,
    ) -> costing_core::Result<AggregateCostBreakdown> {
        tracing::info!(
            "開始多工序估算: {} 道工序, 數量 {}",
            operations.len(),
            quantity
        );

        let nrc_per_unit = match nrc {
            Some(input) => self.amortize_nrc(input)?.nrc_per_unit,
            None => Decimal::ZERO,
        };
        let material_cost_per_unit = match material {
            Some(input) => self.cost_material(input)?.material_cost_per_unit,
            None => Decimal::ZERO,
        };

        let result = CostAggregator::multi(
            &self.policy,
            operations,
            quantity,
            miscellaneous_amount,
            nrc_per_unit,
            material_cost_per_unit,
        )?;

        tracing::info!(
            "多工序估算完成: 每件 {}, 總價 {}",
            result.total_unit_cost,
            result.total_cost
        );
        Ok(result)
    }

    /// 自動選擇機台
    pub fn select_machine(
        &self,
        operation: &Operation,
        duty: DutyCategory,
        material: &Material,
        category: Option<MachineCategory>,
    ) -> (String, MachineCategory) {
        let selection = MachineSelector::select(operation, duty, material, category);
        (selection.name, selection.category)
    }

    /// 每件工時；指定的正值優先
    pub fn man_hours(
        &self,
        operation: &Operation,
        duty: DutyCategory,
        override_hours: Option<Decimal>,
    ) -> Decimal {
        self.man_hours.man_hours(operation, duty, override_hours)
    }

    /// 工資率 C
    pub fn wage_rate(&self, machine_name: &str) -> Decimal {
        WageRateLookup::for_machine_name(&self.policy, machine_name)
    }

    fn find_machine(&self, name: &str) -> costing_core::Result<MachineRecord> {
        self.catalog
            .find_machine_by_name(name)?
            .ok_or_else(|| CostError::MachineNotFound(name.to_string()))
    }
}
