use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// 列过滤条件: column_id 取值属于 values 之一
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRule {
    pub column_id: String,
    pub values: Vec<String>,
}

/// 首页查询的过滤条件 (分组 或 列值)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    Groups(Vec<String>),
    Columns(Vec<ColumnRule>),
}

impl Filter {
    /// 转换为 items_page 的 query_params.rules
    pub fn to_rules(&self) -> Value {
        match self {
            Filter::Groups(groups) => json!([{
                "column_id": "group",
                "compare_value": groups,
                "operator": "any_of",
            }]),
            Filter::Columns(rules) => Value::Array(
                rules
                    .iter()
                    .map(|r| {
                        json!({
                            "column_id": r.column_id,
                            "compare_value": r.values,
                            "operator": "any_of",
                        })
                    })
                    .collect(),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Filter::Groups(groups) => groups.is_empty(),
            Filter::Columns(rules) => rules.is_empty(),
        }
    }
}
