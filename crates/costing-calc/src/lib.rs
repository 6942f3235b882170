//! # Costing Calculation Engine
//!
//! 加工件單件成本估算引擎：幾何解析、負荷判定、機台選擇、
//! 機時費率解析、NRC 攤提、材料成本與成本彙總

pub mod aggregator;
pub mod duty;
pub mod estimator;
pub mod geometry;
pub mod man_hours;
pub mod material_cost;
pub mod methodology;
pub mod mhr;
pub mod nrc;
pub mod selector;
pub mod wage;

// Re-export 主要類型
pub use aggregator::{CostAggregator, CostComponents, OperationCost};
pub use duty::DutyClassifier;
pub use estimator::{CostEngine, EstimateRequest};
pub use geometry::{DimensionRule, GeometryResolver, ResolvedGeometry};
pub use man_hours::ManHoursMatrix;
pub use material_cost::{MaterialCostCalculator, MaterialCostInput};
pub use methodology::{MethodologyEntry, MethodologyTable};
pub use mhr::{MachineHourRateResolver, RateQuery, RateSource, ResolvedRate};
pub use nrc::{NrcAmortizer, NrcInput};
pub use selector::{MachineSelection, MachineSelector};
pub use wage::WageRateLookup;
