use crate::client::queries::{FIRST_PAGE_QUERY, NEXT_PAGE_QUERY};
use crate::client::MondayClient;
use crate::config::BoardConfig;
use crate::error::{ReportError, Result};
use crate::models::{Filter, ItemId};
use futures::future::try_join_all;
use indexmap::IndexSet;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: ItemId,
}

#[derive(Debug, Deserialize)]
struct ItemsPage {
    cursor: Option<String>,
    #[serde(default)]
    items: Vec<IdOnly>,
}

#[derive(Debug, Deserialize)]
struct BoardPage {
    items_page: ItemsPage,
}

#[derive(Debug, Deserialize)]
struct FirstPageData {
    #[serde(default)]
    boards: Vec<BoardPage>,
}

#[derive(Debug, Deserialize)]
struct NextPageData {
    next_items_page: Option<ItemsPage>,
}

/// ID 收集: 按 cursor 翻页拿到过滤条件下的全部 item id
pub struct IdCollector {
    client: MondayClient,
    board_id: u64,
    page_size: u32,
}

impl IdCollector {
    pub fn new(client: MondayClient, board: &BoardConfig) -> Self {
        Self {
            client,
            board_id: board.board_id,
            page_size: board.page_size,
        }
    }

    /// 多个过滤条件并发收集，结果保序去重
    pub async fn collect(&self, filters: &[Filter]) -> Result<Vec<ItemId>> {
        let per_filter = try_join_all(filters.iter().map(|f| self.collect_filter(f))).await?;

        let mut ids: IndexSet<ItemId> = IndexSet::new();
        for batch in per_filter {
            ids.extend(batch);
        }

        tracing::info!(
            "Board {}: collected {} unique item ids from {} filter(s)",
            self.board_id,
            ids.len(),
            filters.len()
        );
        Ok(ids.into_iter().collect())
    }

    /// 单个过滤条件: 首页带 rules，之后只带 cursor
    pub async fn collect_filter(&self, filter: &Filter) -> Result<Vec<ItemId>> {
        if filter.is_empty() {
            tracing::warn!("Board {}: empty filter, skipping", self.board_id);
            return Ok(Vec::new());
        }

        let first: FirstPageData = self
            .client
            .query(
                FIRST_PAGE_QUERY,
                json!({
                    "boardIds": [self.board_id.to_string()],
                    "limit": self.page_size,
                    "rules": filter.to_rules(),
                }),
            )
            .await?;

        let page = first
            .boards
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::upstream(format!("board {} not found", self.board_id)))?
            .items_page;

        let mut ids: Vec<ItemId> = page.items.into_iter().map(|i| i.id).collect();
        if ids.is_empty() {
            return Ok(ids);
        }

        let mut cursor = page.cursor;
        let mut pages = 1;
        while let Some(current) = cursor.take() {
            let next: NextPageData = self
                .client
                .query(
                    NEXT_PAGE_QUERY,
                    json!({ "cursor": current, "limit": self.page_size }),
                )
                .await?;

            let Some(page) = next.next_items_page else {
                break;
            };
            if page.items.is_empty() {
                break;
            }

            pages += 1;
            ids.extend(page.items.into_iter().map(|i| i.id));
            cursor = page.cursor;
            tracing::debug!("Board {}: page {}, {} ids so far", self.board_id, pages, ids.len());
        }

        Ok(ids)
    }
}
