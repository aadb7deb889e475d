//! Reef Reserve Server - 餐厅预订协调节点
//!
//! # 架构概述
//!
//! 本模块是预订协调服务的主入口，提供以下核心功能：
//!
//! - **桌台注册表** (`registry`): 桌台占用状态，按行串行化写入
//! - **预订引擎** (`reservations`): 预订状态机与定时巡检（no-show / 超时）
//! - **扫码入座** (`checkin`): 无状态 HMAC 签名令牌
//! - **前厅视图** (`waiter`): 桌台 + 预订 + 厨房订单的聚合快照
//! - **支付记录** (`payments`): 现金与模拟电子支付、退款
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! reef-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── registry/      # 桌台注册表
//! ├── reservations/  # 预订引擎 + 巡检
//! ├── checkin/       # 扫码入座令牌
//! ├── waiter/        # 前厅聚合视图
//! ├── payments/      # 支付记录与网关抽象
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod checkin;
pub mod core;
pub mod payments;
pub mod registry;
pub mod reservations;
pub mod utils;
pub mod waiter;

// Re-export 公共类型
pub use checkin::{CheckinClaims, CheckinTokenService, TokenError};
pub use core::server::setup_environment;
pub use core::{Config, Server, ServerState};
pub use payments::{MockPaymentGateway, PaymentGateway, PaymentRecorder};
pub use registry::TableRegistry;
pub use reservations::{ReservationEngine, ReservationSweeper};
pub use utils::{AppError, AppResult};
pub use waiter::{OrderClient, WaiterService};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____             ____
   / __ \___  ___  / __/
  / /_/ / _ \/ _ \/ /_
 / _, _/  __/  __/ __/
/_/ |_|\___/\___/_/
    ____
   / __ \___  ________  ______   _____
  / /_/ / _ \/ ___/ _ \/ ___/ | / / _ \
 / _, _/  __(__  )  __/ /   | |/ /  __/
/_/ |_|\___/____/\___/_/    |___/\___/
    "#
    );
}
