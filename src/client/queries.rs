/// 首页: 按 rules 过滤，返回 cursor + items
pub const FIRST_PAGE_QUERY: &str = r#"
query FirstItemsPage($boardIds: [ID!], $limit: Int!, $rules: [ItemsQueryRule!]) {
  boards(ids: $boardIds) {
    items_page(limit: $limit, query_params: { rules: $rules, operator: and }) {
      cursor
      items { id }
    }
  }
}
"#;

/// 后续页: 只接受 cursor，过滤条件由 cursor 携带
pub const NEXT_PAGE_QUERY: &str = r#"
query NextItemsPage($cursor: String!, $limit: Int!) {
  next_items_page(limit: $limit, cursor: $cursor) {
    cursor
    items { id }
  }
}
"#;

const COLUMN_FIELDS: &str = r#"
fragment ColumnFields on ColumnValue {
  id
  type
  text
  ... on FormulaValue { display_value }
  ... on StatusValue { label }
  ... on DateValue { date }
  ... on NumbersValue { number }
  ... on DropdownValue { values { label } }
}
"#;

/// 批量拉取 item 明细 (id/name + 指定列)
pub fn items_query(include_subitems: bool) -> String {
    let subitems = if include_subitems {
        r#"
    subitems {
      id
      name
      column_values(ids: $columns) { ...ColumnFields }
    }"#
    } else {
        ""
    };

    format!(
        r#"
query ItemDetails($ids: [ID!], $limit: Int, $columns: [String!]) {{
  items(ids: $ids, limit: $limit) {{
    id
    name
    column_values(ids: $columns) {{ ...ColumnFields }}{subitems}
  }}
}}
{COLUMN_FIELDS}"#
    )
}
