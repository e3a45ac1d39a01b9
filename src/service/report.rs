use super::aggregator::aggregate;
use super::{BatchHydrator, IdCollector};
use crate::client::MondayClient;
use crate::config::BoardConfig;
use crate::error::Result;
use crate::models::BoardReport;
use chrono::Utc;
use std::time::Instant;

/// 看板报表服务: 收集 id → 分批拉取 → 分桶汇总
pub struct ReportService {
    board: BoardConfig,
    collector: IdCollector,
    hydrator: BatchHydrator,
}

impl ReportService {
    pub fn new(client: MondayClient, board: BoardConfig) -> Self {
        Self {
            collector: IdCollector::new(client.clone(), &board),
            hydrator: BatchHydrator::new(client, &board),
            board,
        }
    }

    /// 生成一次完整报表；任一阶段出错则整体失败
    pub async fn build_report(&self) -> Result<BoardReport> {
        let started = Instant::now();

        // Phase 1: 收集 item id
        let ids = self.collector.collect(&self.board.filters).await?;
        if ids.is_empty() {
            tracing::info!("Board {}: no items match the filters", self.board.board_id);
        }

        // Phase 2: 分批拉取列值
        let columns = self.board.columns.ids();
        let records = self.hydrator.hydrate(&ids, &columns).await?;

        // Phase 3: 分桶汇总
        let report = aggregate(&records, &self.board, Utc::now());

        tracing::info!(
            "Board {}: report ready in {:?} - B2C {} ({} EUR), B2B {} ({} EUR), Other {}",
            self.board.board_id,
            started.elapsed(),
            report.b2c.meta.total_items,
            report.b2c.meta.total_sum_eur,
            report.b2b.meta.total_items,
            report.b2b.meta.total_sum_eur,
            report.other.meta.total_items
        );
        Ok(report)
    }
}
