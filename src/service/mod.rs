pub mod aggregator;
pub mod collector;
pub mod hydrator;
pub mod report;

pub use aggregator::aggregate;
pub use collector::IdCollector;
pub use hydrator::BatchHydrator;
pub use report::ReportService;
