//! 車削件報價示例

use costing::{
    CostEngine, Dimensions, DutyCategory, EstimateRequest, InMemoryCatalog, MachineRecord,
    Material, MaterialCostInput, NrcInput, Operation, OperationCost, Shape,
};
use rust_decimal::Decimal;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== 車削件報價示例 ===\n");

    // 參考資料
    let catalog = InMemoryCatalog::new()
        .with_operation(1, "Turning")
        .with_operation(2, "Milling")
        .with_duty(1, "Light duty")
        .with_duty(2, "Medium duty")
        .with_duty(3, "Heavy duty")
        .with_machine(MachineRecord::new(10, "CNC Lathe"))
        .with_machine(MachineRecord::new(11, "Conventional Lathe"))
        .with_machine(MachineRecord::new(12, "CNC Mill"));
    let engine = CostEngine::with_defaults(Arc::new(catalog));

    // 鋼材 Ø50 × 200 車削
    let request = EstimateRequest::new(
        Material::Steel,
        Operation::Turning,
        Dimensions::round(Decimal::from(50), Decimal::from(200)),
        Decimal::new(5, 1),
    )
    .with_machine("CNC Lathe");

    let estimate = engine.estimate_unit_cost(&request)?;
    println!(
        "負荷: {}, 機台: {} ({}), 體積: {} mm³",
        estimate.duty, estimate.machine.name, estimate.machine_category, estimate.volume_mm3
    );
    println!("\n計算過程:");
    for step in &estimate.calculation_steps {
        println!(
            "  {:<28} {:<40} {} = {}",
            step.name, step.formula, step.calculation, step.result
        );
    }

    // 車削 + 銑削，含 NRC 與材料費
    let operations = [
        OperationCost::new(
            Operation::Turning,
            estimate.duty,
            estimate.cost_breakdown.man_hours_per_unit,
            estimate.cost_breakdown.machine_hour_rate,
            estimate.cost_breakdown.wage_rate,
        ),
        OperationCost::new(
            Operation::Milling,
            DutyCategory::Light,
            engine.man_hours(&Operation::Milling, DutyCategory::Light, None),
            engine.resolve_machine_hour_rate_with_fallback(
                &Operation::Milling,
                DutyCategory::Light,
                "CNC Mill",
            ),
            engine.wage_rate("CNC Mill"),
        ),
    ];
    let nrc = NrcInput::new(100).with_tooling(Decimal::from(50_000));
    let material = MaterialCostInput::new(
        Material::Steel,
        Shape::Round,
        Dimensions::round(Decimal::from(50), Decimal::from(200)),
        Decimal::from(85),
    );

    let aggregate =
        engine.estimate_multi_operation(&operations, 100, Decimal::ZERO, Some(&nrc), Some(&material))?;
    println!("\n多工序彙總:");
    println!("  每件成本: {}", aggregate.total_unit_cost);
    println!("  總價 ({} 件): {}", aggregate.quantity, aggregate.total_cost);
    println!("  外包機時費率: {}", aggregate.outsourcing_mhr);

    Ok(())
}
