use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// monday item id (上游以字符串返回，也兼容整数)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => ItemId(s),
            Raw::Int(n) => ItemId(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DropdownOption {
    pub label: String,
}

/// 列值，按上游 `type` 字段区分
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnValue {
    Formula {
        display_value: Option<String>,
    },
    #[serde(alias = "color")]
    Status {
        label: Option<String>,
    },
    Date {
        date: Option<String>,
    },
    Numbers {
        number: Option<f64>,
        text: Option<String>,
    },
    Dropdown {
        #[serde(default)]
        values: Vec<DropdownOption>,
    },
    #[serde(other)]
    Unsupported,
}

impl ColumnValue {
    /// 状态列标签
    pub fn label(&self) -> Option<&str> {
        match self {
            ColumnValue::Status { label } => label.as_deref(),
            _ => None,
        }
    }

    /// 日期列 (YYYY-MM-DD)，格式异常视为空
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ColumnValue::Date { date: Some(d) } => NaiveDate::parse_from_str(d, "%Y-%m-%d").ok(),
            _ => None,
        }
    }

    /// 统一的展示文本
    pub fn display_text(&self) -> Option<String> {
        let text = match self {
            ColumnValue::Formula { display_value } => display_value.clone(),
            ColumnValue::Status { label } => label.clone(),
            ColumnValue::Date { date } => date.clone(),
            ColumnValue::Numbers { number, text } => {
                text.clone().or_else(|| number.map(|n| n.to_string()))
            }
            ColumnValue::Dropdown { values } => Some(
                values
                    .iter()
                    .map(|v| v.label.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            ColumnValue::Unsupported => None,
        };
        text.filter(|t| !t.is_empty())
    }
}

/// GraphQL 返回的 column_values 元素
#[derive(Debug, Clone, Deserialize)]
pub struct RawColumnValue {
    pub id: String,
    #[serde(flatten)]
    pub value: ColumnValue,
}

/// GraphQL 返回的 item (含可选 subitems)
#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub column_values: Vec<RawColumnValue>,
    #[serde(default)]
    pub subitems: Option<Vec<RawItem>>,
}

impl RawItem {
    /// 展开为记录: 父 item 在前，其 subitems 紧随其后
    pub fn into_records(self) -> Vec<ItemRecord> {
        let RawItem {
            id,
            name,
            column_values,
            subitems,
        } = self;

        let mut records = vec![ItemRecord::new(id.clone(), name, None, column_values)];
        for sub in subitems.unwrap_or_default() {
            records.push(ItemRecord::new(
                sub.id,
                sub.name,
                Some(id.clone()),
                sub.column_values,
            ));
        }
        records
    }
}

/// 解码后的 item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub parent_id: Option<ItemId>,
    pub columns: HashMap<String, ColumnValue>,
}

impl ItemRecord {
    pub fn new(
        id: ItemId,
        name: String,
        parent_id: Option<ItemId>,
        column_values: Vec<RawColumnValue>,
    ) -> Self {
        Self {
            id,
            name,
            parent_id,
            columns: column_values
                .into_iter()
                .map(|cv| (cv.id, cv.value))
                .collect(),
        }
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnValue> {
        self.columns.get(column_id)
    }
}
