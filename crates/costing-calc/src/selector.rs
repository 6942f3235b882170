//! 機台選擇

use costing_core::{DutyCategory, MachineCategory, Material, Operation};

/// 標準機台名稱表：(工序, 類別, 機台顯示名稱)
const MACHINE_NAMES: &[(&str, MachineCategory, &str)] = &[
    ("turning", MachineCategory::Conventional, "Conventional Lathe"),
    ("turning", MachineCategory::Cnc3Axis, "CNC Lathe"),
    ("turning", MachineCategory::Cnc5Axis, "CNC Lathe"),
    ("turning", MachineCategory::Spm, "Special Purpose Lathe"),
    ("milling", MachineCategory::Conventional, "Conv.Milling"),
    ("milling", MachineCategory::Cnc3Axis, "CNC Mill"),
    ("milling", MachineCategory::Cnc5Axis, "5 axis cnc"),
    ("milling", MachineCategory::Spm, "Special Purpose Machine (SPM)"),
    ("drilling", MachineCategory::Conventional, "Conventional Drill Press"),
    ("drilling", MachineCategory::Cnc3Axis, "CNC Drilling Machine"),
    ("drilling", MachineCategory::Cnc5Axis, "CNC Multi-Axis Drill"),
    ("drilling", MachineCategory::Spm, "Special Purpose Drill"),
    ("grinding", MachineCategory::Conventional, "Conventional"),
    ("grinding", MachineCategory::Cnc3Axis, "CNC"),
    ("grinding", MachineCategory::Cnc5Axis, "Special Purpose Machine(SPM)"),
    ("grinding", MachineCategory::Spm, "Special Purpose Grinder"),
    ("boring", MachineCategory::Conventional, "Small (less than 650 MMX 650 MM)"),
    ("boring", MachineCategory::Cnc3Axis, "CNC"),
    ("boring", MachineCategory::Cnc5Axis, "Medium (more than 650 MMX 650 MM)"),
    ("boring", MachineCategory::Spm, "Special Purpose Boring"),
];

/// 選定的機台
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineSelection {
    pub name: String,
    pub category: MachineCategory,
}

/// 機台選擇器（未指定機台時使用）
pub struct MachineSelector;

impl MachineSelector {
    /// 決定機台類別；呼叫端指定的類別優先
    pub fn category_for(
        duty: DutyCategory,
        material: &Material,
        requested: Option<MachineCategory>,
    ) -> MachineCategory {
        if let Some(category) = requested {
            return category;
        }

        if duty == DutyCategory::Heavy || *material == Material::Titanium {
            MachineCategory::Cnc5Axis
        } else if duty == DutyCategory::Medium {
            MachineCategory::Cnc3Axis
        } else {
            MachineCategory::Conventional
        }
    }

    /// 工序 + 類別 → 機台顯示名稱
    pub fn machine_name(operation: &Operation, category: MachineCategory) -> String {
        MACHINE_NAMES
            .iter()
            .find(|(op, cat, _)| *op == operation.as_str() && *cat == category)
            .map(|(_, _, name)| name.to_string())
            .unwrap_or_else(|| format!("{} Machine", category.as_str().to_uppercase()))
    }

    /// 選擇機台
    pub fn select(
        operation: &Operation,
        duty: DutyCategory,
        material: &Material,
        requested: Option<MachineCategory>,
    ) -> MachineSelection {
        let category = Self::category_for(duty, material, requested);
        let name = Self::machine_name(operation, category);

        tracing::debug!(
            "自動選擇機台: 工序 {}, 負荷 {}, 材料 {} → {} ({})",
            operation,
            duty,
            material,
            name,
            category
        );

        MachineSelection { name, category }
    }
}
