use crate::error::Result;
use crate::models::Filter;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_API_URL: &str = "https://api.monday.com/v2";
pub const DEFAULT_API_VERSION: &str = "2024-10";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub monday: MondayConfig,
    pub board: BoardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// monday API 连接配置
#[derive(Clone, Serialize, Deserialize)]
pub struct MondayConfig {
    pub api_url: String,
    pub api_version: String,
    pub api_key: Option<String>,
    /// 调用方共享密钥 (Bearer / x-api-key)，为空则不校验
    pub client_secret: Option<String>,
    pub request_timeout_secs: u64,
    /// 单次查询总尝试次数上限 (含首次)，0 表示不限
    pub max_attempts: u32,
}

// 不打印密钥
impl fmt::Debug for MondayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MondayConfig")
            .field("api_url", &self.api_url)
            .field("api_version", &self.api_version)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// 列 id 映射
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMap {
    /// B2C / B2B 状态列
    pub type_col: String,
    /// 金额列 (formula 或 numbers)
    pub sum_col: String,
    pub date_col: String,
    pub cost_col: Option<String>,
    pub profit_col: Option<String>,
    pub household_col: Option<String>,
    pub installer_col: Option<String>,
    pub sale_type_col: Option<String>,
}

impl ColumnMap {
    /// 需要拉取的全部列 id
    pub fn ids(&self) -> Vec<String> {
        let mut ids = vec![
            self.sum_col.clone(),
            self.type_col.clone(),
            self.date_col.clone(),
        ];
        ids.extend(
            [
                &self.cost_col,
                &self.profit_col,
                &self.household_col,
                &self.installer_col,
                &self.sale_type_col,
            ]
            .into_iter()
            .flatten()
            .cloned(),
        );
        ids
    }
}

/// 可接受的类型标签 (精确匹配，大小写敏感)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeLabels {
    pub b2c: String,
    pub b2b: String,
}

/// 看板配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub board_id: u64,
    /// 各过滤条件独立分页，结果取并集
    pub filters: Vec<Filter>,
    pub columns: ColumnMap,
    pub labels: TypeLabels,
    pub page_size: u32,
    pub batch_size: usize,
    pub concurrency: usize,
    pub include_subitems: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for MondayConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_key: None,
            client_secret: None,
            request_timeout_secs: 60,
            max_attempts: 10,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            board_id: 1645436514,
            filters: vec![Filter::Groups(vec![
                "new_group50055".to_string(),
                "new_group89286".to_string(),
            ])],
            columns: ColumnMap {
                type_col: "status6".to_string(),
                sum_col: "formula_mkmp4x00".to_string(),
                date_col: "date8".to_string(),
                cost_col: None,
                profit_col: None,
                household_col: None,
                installer_col: None,
                sale_type_col: None,
            },
            labels: TypeLabels {
                b2c: "B2C".to_string(),
                b2b: "B2B".to_string(),
            },
            page_size: 500,
            batch_size: 100,
            concurrency: 4,
            include_subitems: false,
        }
    }
}

/// 环境变量 (扁平 key，config crate 统一转小写)
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    server_host: Option<String>,
    server_port: Option<u16>,
    monday_api_key: Option<String>,
    monday_api_url: Option<String>,
    monday_api_version: Option<String>,
    monday_client_secret: Option<String>,
    monday_board_id: Option<u64>,
    monday_group_ids: Option<Vec<String>>,
    monday_include_subitems: Option<bool>,
    monday_max_attempts: Option<u32>,
    monday_request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        let env = ::config::Config::builder()
            .add_source(
                ::config::Environment::default()
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("monday_group_ids"),
            )
            .build()?;
        let overrides: EnvOverrides = env.try_deserialize()?;
        Ok(Self::default().with_overrides(overrides))
    }

    fn with_overrides(mut self, env: EnvOverrides) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        if let Some(host) = non_empty(env.server_host) {
            self.server.host = host;
        }
        if let Some(port) = env.server_port {
            self.server.port = port;
        }

        self.monday.api_key = non_empty(env.monday_api_key);
        self.monday.client_secret = non_empty(env.monday_client_secret);
        if let Some(url) = non_empty(env.monday_api_url) {
            self.monday.api_url = url;
        }
        if let Some(version) = non_empty(env.monday_api_version) {
            self.monday.api_version = version;
        }
        if let Some(n) = env.monday_max_attempts {
            self.monday.max_attempts = n;
        }
        if let Some(secs) = env.monday_request_timeout_secs {
            self.monday.request_timeout_secs = secs;
        }

        if let Some(board_id) = env.monday_board_id {
            self.board.board_id = board_id;
        }
        if let Some(groups) = env.monday_group_ids {
            let groups: Vec<String> = groups
                .into_iter()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect();
            if !groups.is_empty() {
                self.board.filters = vec![Filter::Groups(groups)];
            }
        }
        if let Some(include) = env.monday_include_subitems {
            self.board.include_subitems = include;
        }
        self
    }
}
