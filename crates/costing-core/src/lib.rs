//! # Costing Core
//!
//! 成本估算核心資料模型與類型定義

pub mod breakdown;
pub mod config;
pub mod duty;
pub mod geometry;
pub mod machine;
pub mod material;
pub mod operation;
pub mod reference;

// Re-export 主要類型
pub use breakdown::{
    AggregateCostBreakdown, CalculationStep, CostBreakdown, MaterialCostRecord, MhrBreakdown,
    NrcRecord, QuickEstimate, UnitCostEstimate,
};
pub use config::CostPolicy;
pub use duty::DutyCategory;
pub use geometry::{Dimensions, GeometrySpec, Shape};
pub use machine::{CategoryBucket, MachineCategory, MachineRecord};
pub use material::Material;
pub use operation::Operation;
pub use reference::{
    normalize_name, InMemoryCatalog, LookupError, MhrConfigRecord, ReferenceCatalog,
};

/// 成本估算錯誤類型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CostError {
    #[error("{operation} 工序輸入無效 ({}): {reason}", .fields.join(", "))]
    Validation {
        operation: String,
        fields: Vec<String>,
        reason: String,
    },

    #[error("找不到機台: '{0}'")]
    MachineNotFound(String),

    #[error("機時費率未配置: 工序 {operation}, 負荷 {duty}, 機台 {machine}")]
    UnresolvedRate {
        operation: String,
        duty: String,
        machine: String,
    },

    #[error("成本政策配置無效: {0}")]
    InvalidConfig(String),

    /// 費率解析層以外的參考資料查詢失敗（例如機台查詢）
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl CostError {
    /// 建立驗證錯誤
    pub fn validation(
        operation: impl Into<String>,
        fields: &[&str],
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            operation: operation.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            reason: reason.into(),
        }
    }

    /// 錯誤涉及的欄位（僅驗證錯誤有值）
    pub fn fields(&self) -> &[String] {
        match self {
            Self::Validation { fields, .. } => fields,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, CostError>;
