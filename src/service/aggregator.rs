use crate::config::{BoardConfig, ColumnMap, TypeLabels};
use crate::models::{BoardReport, BusinessType, ColumnValue, ItemRecord, Report, Row};
use chrono::{DateTime, Utc};

/// formula 列在无法计算时的展示文本
pub const NO_RESULT: &str = "No result";

/// 欧式数字: 去掉所有 `.` 和空白 (含不换行空格)，再把逗号换成小数点
/// 只取开头的数字部分，后缀单位 (`€`、`%`) 忽略
pub fn normalize_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .collect();
    let cleaned = cleaned.replacen(',', ".", 1);
    cleaned[..numeric_prefix_len(&cleaned)]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// 开头合法数字的字节长度: [+-]digits[.digits][(e|E)[+-]digits]
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return 0;
    }

    // 指数部分必须带数字才算
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    end
}

/// formula 列金额: 空或 "No result" 视为无值 (该行不计入)
pub fn parse_formula_amount(display: Option<&str>) -> Option<f64> {
    match display.map(str::trim) {
        None | Some("") | Some(NO_RESULT) => None,
        Some(raw) => normalize_decimal(raw),
    }
}

/// numbers 列金额: 优先原生数值，其次解析文本，都不行则为 0
pub fn numbers_amount(number: Option<f64>, text: Option<&str>) -> f64 {
    number
        .or_else(|| text.and_then(normalize_decimal))
        .unwrap_or(0.0)
}

/// 金额列取值，策略由列类型决定
pub fn sum_amount(column: Option<&ColumnValue>) -> Option<f64> {
    match column? {
        ColumnValue::Formula { display_value } => parse_formula_amount(display_value.as_deref()),
        ColumnValue::Numbers { number, text } => Some(numbers_amount(*number, text.as_deref())),
        _ => None,
    }
}

/// 附加数值列 (成本、利润率)，缺失时为空，不影响行
fn optional_amount(column: Option<&ColumnValue>) -> Option<f64> {
    match column? {
        ColumnValue::Formula { display_value } => parse_formula_amount(display_value.as_deref()),
        ColumnValue::Numbers { number, text } => {
            number.or_else(|| text.as_deref().and_then(normalize_decimal))
        }
        _ => None,
    }
}

/// 类型标签精确匹配，其余一律归入 Other
pub fn classify(label: Option<&str>, labels: &TypeLabels) -> BusinessType {
    match label {
        Some(l) if l == labels.b2c => BusinessType::B2C,
        Some(l) if l == labels.b2b => BusinessType::B2B,
        _ => BusinessType::Other,
    }
}

fn text_of(record: &ItemRecord, column_id: Option<&String>) -> Option<String> {
    record.column(column_id?)?.display_text()
}

/// 单条记录转为输出行；金额缺失 (formula 无值) 时返回 None
pub fn build_row(record: &ItemRecord, columns: &ColumnMap, labels: &TypeLabels) -> Option<Row> {
    let sum_eur = sum_amount(record.column(&columns.sum_col))?;

    let label = record
        .column(&columns.type_col)
        .and_then(ColumnValue::display_text);

    Some(Row {
        id: record.id.clone(),
        name: record.name.clone(),
        business_type: classify(label.as_deref(), labels),
        installation_date: record.column(&columns.date_col).and_then(ColumnValue::date),
        sum_eur,
        savikaina_eur: columns
            .cost_col
            .as_ref()
            .and_then(|c| optional_amount(record.column(c))),
        profit_pct: columns
            .profit_col
            .as_ref()
            .and_then(|c| optional_amount(record.column(c))),
        household_type: text_of(record, columns.household_col.as_ref()),
        installer: text_of(record, columns.installer_col.as_ref()),
        sale_type: text_of(record, columns.sale_type_col.as_ref()),
        parent_id: record.parent_id.clone(),
    })
}

/// 分桶并汇总；同样的输入总得到同样的输出
pub fn aggregate(
    records: &[ItemRecord],
    board: &BoardConfig,
    fetched_at: DateTime<Utc>,
) -> BoardReport {
    let mut b2c = Vec::new();
    let mut b2b = Vec::new();
    let mut other = Vec::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(row) = build_row(record, &board.columns, &board.labels) else {
            skipped += 1;
            continue;
        };
        match row.business_type {
            BusinessType::B2C => b2c.push(row),
            BusinessType::B2B => b2b.push(row),
            BusinessType::Other => other.push(row),
        }
    }

    if skipped > 0 {
        tracing::info!("{} record(s) without an amount were left out", skipped);
    }

    BoardReport {
        fetched_at,
        b2c: Report::from_rows(BusinessType::B2C, b2c),
        b2b: Report::from_rows(BusinessType::B2B, b2b),
        other: Report::from_rows(BusinessType::Other, other),
    }
}
