use catalog_client::ClientConfig;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Engine configuration
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 本地存储与收据文件目录 |
/// | CATALOG_URL | https://dummyjson.com | 商品目录/认证服务地址 |
/// | PAGE_SIZE | 5 | 每页商品数 |
/// | WALLET_SEED | 2400 | 钱包默认余额 |
/// | CURRENCY | KES | 金额显示币种 |
/// | REQUEST_TIMEOUT_SECS | 30 | 请求超时(秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset) | 滚动日志目录 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/tmp/checkout PAGE_SIZE=10 cargo run -p checkout-engine
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存放 redb 数据库和收据文件
    pub work_dir: String,
    /// Catalog and auth base URL
    pub catalog_url: String,
    /// Products per catalog page
    pub page_size: u32,
    /// Balance reported when no wallet balance is persisted
    pub wallet_seed: Decimal,
    /// Currency code appended to formatted amounts
    pub currency: String,
    /// HTTP request timeout (seconds)
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 以 `Default` 为基础，环境变量未设置或无法解析时保留默认值
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("WORK_DIR") {
            config.work_dir = v;
        }
        if let Ok(v) = std::env::var("CATALOG_URL") {
            config.catalog_url = v;
        }
        if let Some(v) = env_parse::<u32>("PAGE_SIZE").filter(|p| *p > 0) {
            config.page_size = v;
        }
        if let Some(v) = env_parse::<Decimal>("WALLET_SEED").filter(|v| !v.is_sign_negative()) {
            config.wallet_seed = v;
        }
        if let Ok(v) = std::env::var("CURRENCY") {
            config.currency = v;
        }
        if let Some(v) = env_parse("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        config.log_dir = std::env::var("LOG_DIR").ok();
        config
    }

    /// 使用自定义工作目录和目录服务地址
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, catalog_url: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.catalog_url = catalog_url.into();
        config
    }

    /// Path of the local key/value database
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("checkout.redb")
    }

    /// Directory fallback receipts are written to
    pub fn receipts_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("receipts")
    }

    /// HTTP client configuration derived from this config
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.catalog_url).with_timeout(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: "./data".into(),
            catalog_url: catalog_client::config::DEFAULT_BASE_URL.into(),
            page_size: 5,
            wallet_seed: crate::wallet::DEFAULT_SEED_BALANCE,
            currency: "KES".into(),
            request_timeout_secs: 30,
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
