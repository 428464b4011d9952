//! Detection: the buildpack participates when any label variable is set.

use toml_edit::{value, ArrayOfTables, DocumentMut, Item, Table};
use tracing::debug;

use crate::config::Environment;
use crate::oci::trigger_variables;

/// Name this buildpack provides and requires in its build plan.
pub const PLAN_NAME: &str = "image-labels";

/// Exit code for a failed detection.
pub const FAIL_EXIT_CODE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlanProvide {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlanRequire {
    pub name: String,
}

/// One set of provides/requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    pub provides: Vec<BuildPlanProvide>,
    pub requires: Vec<BuildPlanRequire>,
}

impl BuildPlan {
    fn write_into(&self, table: &mut Table) {
        if !self.provides.is_empty() {
            let names = self.provides.iter().map(|p| p.name.as_str());
            table.insert("provides", Item::ArrayOfTables(named_tables(names)));
        }
        if !self.requires.is_empty() {
            let names = self.requires.iter().map(|r| r.name.as_str());
            table.insert("requires", Item::ArrayOfTables(named_tables(names)));
        }
    }
}

fn named_tables<'a>(names: impl Iterator<Item = &'a str>) -> ArrayOfTables {
    let mut tables = ArrayOfTables::new();
    for name in names {
        let mut table = Table::new();
        table.insert("name", value(name));
        tables.push(table);
    }
    tables
}

/// Outcome of detection. A passing result carries the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectResult {
    pub plan: Option<BuildPlan>,
}

impl DetectResult {
    pub fn passed(&self) -> bool {
        self.plan.is_some()
    }

    /// Render the plan as `plan.toml`.
    pub fn plan_toml(&self) -> String {
        let mut doc = DocumentMut::new();
        if let Some(plan) = &self.plan {
            plan.write_into(doc.as_table_mut());
        }
        doc.to_string()
    }

    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            0
        } else {
            FAIL_EXIT_CODE
        }
    }
}

/// Pass if any well-known variable or `$BP_IMAGE_LABELS` is set, even to
/// the empty string.
pub fn detect(env: &dyn Environment) -> DetectResult {
    let mut pass = false;
    for variable in trigger_variables() {
        if env.lookup(variable).is_some() {
            debug!(variable, "label variable set");
            pass = true;
        }
    }

    if !pass {
        return DetectResult::default();
    }

    DetectResult {
        plan: Some(BuildPlan {
            provides: vec![BuildPlanProvide {
                name: PLAN_NAME.to_string(),
            }],
            requires: vec![BuildPlanRequire {
                name: PLAN_NAME.to_string(),
            }],
        }),
    }
}
