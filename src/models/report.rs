use super::ItemId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 业务类型分桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    B2C,
    B2B,
    Other,
}

/// 输出行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "type")]
    pub business_type: BusinessType,
    pub installation_date: Option<NaiveDate>,
    pub sum_eur: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savikaina_eur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    #[serde(rename = "type")]
    pub business_type: BusinessType,
    pub total_items: usize,
    pub total_sum_eur: f64,
}

/// 单个分桶的汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub items: Vec<Row>,
}

impl Report {
    pub fn from_rows(business_type: BusinessType, items: Vec<Row>) -> Self {
        let total: f64 = items.iter().map(|r| r.sum_eur).sum();
        Self {
            meta: ReportMeta {
                business_type,
                total_items: items.len(),
                total_sum_eur: round_cents(total),
            },
            items,
        }
    }
}

/// 接口返回体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardReport {
    pub fetched_at: DateTime<Utc>,
    pub b2c: Report,
    pub b2b: Report,
    pub other: Report,
}

/// 保留两位小数 (四舍五入，远离零)
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, sum_eur: f64) -> Row {
        Row {
            id: ItemId::from(id),
            name: id.to_string(),
            business_type: BusinessType::B2C,
            installation_date: None,
            sum_eur,
            savikaina_eur: None,
            profit_pct: None,
            household_type: None,
            installer: None,
            sale_type: None,
            parent_id: None,
        }
    }

    #[test]
    fn totals_round_to_two_decimals() {
        let report = Report::from_rows(BusinessType::B2C, vec![row("1", 10.005), row("2", 20.00)]);
        assert_eq!(report.meta.total_items, 2);
        assert_eq!(report.meta.total_sum_eur, 30.01);
    }

    #[test]
    fn empty_bucket_has_zero_totals() {
        let report = Report::from_rows(BusinessType::Other, Vec::new());
        assert_eq!(report.meta.total_items, 0);
        assert_eq!(report.meta.total_sum_eur, 0.0);
    }

    #[test]
    fn row_serializes_type_and_skips_absent_extras() {
        let json = serde_json::to_value(row("5", 1.5)).unwrap();
        assert_eq!(json["type"], "B2C");
        assert_eq!(json["id"], "5");
        assert!(json.get("installer").is_none());
        assert!(json["installation_date"].is_null());
    }
}
