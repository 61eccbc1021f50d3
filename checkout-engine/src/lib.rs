//! Checkout engine - 购物结算核心
//!
//! # 架构概述
//!
//! 浏览商品目录、累计选购行、核对金额、输入验证码，然后从本地钱包扣款并生成收据。
//!
//! - **选购** (`selection`): 选购行与扣减金额计算
//! - **钱包** (`wallet`): 本地持久化余额
//! - **结算会话** (`session`): 支付状态机、验证码输入、收据交付
//! - **目录** (`catalog`): 分页加载商品
//! - **存储** (`store`): redb / 内存 key-value 存储
//!
//! # 模块结构
//!
//! ```text
//! checkout-engine/src/
//! ├── core/          # 配置
//! ├── store/         # key-value 存储与类型化访问
//! ├── catalog/       # 商品来源与分页
//! ├── session/       # 结算会话、验证码、收据
//! ├── utils/         # 日志
//! ├── auth.rs        # 登录状态
//! ├── flow.rs        # 页面流转
//! ├── money.rs       # 金额计算与输入解析
//! ├── selection.rs   # 选购聚合
//! └── wallet.rs      # 钱包
//! ```

pub mod auth;
pub mod catalog;
pub mod core;
pub mod flow;
pub mod money;
pub mod selection;
pub mod session;
pub mod store;
pub mod utils;
pub mod wallet;

// Re-export 公共类型
pub use auth::AuthContext;
pub use catalog::{CatalogError, CatalogPager, CatalogSource};
pub use core::Config;
pub use flow::{CheckoutFlow, Route};
pub use selection::SelectionAggregator;
pub use session::{
    CheckoutSession, Handoff, PaymentOutcome, Receipt, ReceiptArtifact, ReceiptSink,
    SessionError, SessionState, TextReceiptSink, VerificationPad,
};
pub use store::{KeyValueStore, LocalStore, MemoryStore, PersistedState, StoreError};
pub use wallet::WalletLedger;

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 加载 .env、读取配置并初始化日志
pub fn setup_environment() -> Config {
    // .env 不存在时忽略
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}
