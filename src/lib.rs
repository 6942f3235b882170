//! # Costing
//!
//! 加工件成本估算：資料模型 ([`costing_core`]) 與計算引擎 ([`costing_calc`])

pub use costing_calc;
pub use costing_core;

pub use costing_calc::{CostEngine, EstimateRequest, MaterialCostInput, NrcInput, OperationCost};
pub use costing_core::{
    CostError, CostPolicy, Dimensions, DutyCategory, InMemoryCatalog, MachineCategory,
    MachineRecord, Material, MhrConfigRecord, Operation, ReferenceCatalog, Shape,
};
