use crate::client::queries::items_query;
use crate::client::MondayClient;
use crate::config::BoardConfig;
use crate::error::Result;
use crate::models::{ItemId, ItemRecord, RawItem};
use futures::{stream, StreamExt, TryStreamExt};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ItemsData {
    #[serde(default)]
    items: Vec<RawItem>,
}

/// 分批拉取 item 的列值
pub struct BatchHydrator {
    client: MondayClient,
    batch_size: usize,
    concurrency: usize,
    include_subitems: bool,
}

impl BatchHydrator {
    pub fn new(client: MondayClient, board: &BoardConfig) -> Self {
        Self {
            client,
            batch_size: board.batch_size.max(1),
            concurrency: board.concurrency.max(1),
            include_subitems: board.include_subitems,
        }
    }

    /// 每批一个请求，最多 `concurrency` 批同时在途；输出保持批次顺序
    pub async fn hydrate(&self, ids: &[ItemId], columns: &[String]) -> Result<Vec<ItemRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = items_query(self.include_subitems);
        let total_batches = ids.len().div_ceil(self.batch_size);

        // 先建好各批 future，再交给 stream 限制在途数量
        let pending: Vec<_> = ids
            .chunks(self.batch_size)
            .enumerate()
            .map(|(idx, chunk)| self.fetch_batch(&query, idx, total_batches, chunk, columns))
            .collect();

        let batches: Vec<Vec<ItemRecord>> = stream::iter(pending)
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let records: Vec<ItemRecord> = batches.into_iter().flatten().collect();
        tracing::info!(
            "Hydrated {} records from {} ids in {} batch(es)",
            records.len(),
            ids.len(),
            total_batches
        );
        Ok(records)
    }

    async fn fetch_batch(
        &self,
        query: &str,
        idx: usize,
        total: usize,
        chunk: &[ItemId],
        columns: &[String],
    ) -> Result<Vec<ItemRecord>> {
        let data: ItemsData = self
            .client
            .query(
                query,
                json!({
                    "ids": chunk,
                    "limit": chunk.len(),
                    "columns": columns,
                }),
            )
            .await?;

        tracing::debug!("Batch {}/{}: {} items", idx + 1, total, data.items.len());
        Ok(data
            .items
            .into_iter()
            .flat_map(RawItem::into_records)
            .collect())
    }
}
