pub mod filter;
pub mod item;
pub mod report;

pub use filter::{ColumnRule, Filter};
pub use item::{ColumnValue, DropdownOption, ItemId, ItemRecord, RawColumnValue, RawItem};
pub use report::{round_cents, BoardReport, BusinessType, Report, ReportMeta, Row};
