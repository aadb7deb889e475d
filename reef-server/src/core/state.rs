//! 服务器状态 - 持有所有服务的单例引用
//!
//! ServerState 是协调节点的核心数据结构，持有所有服务的共享引用。
//! 使用 Arc 实现浅拷贝，所有权成本极低。
//!
//! # 服务组件
//!
//! | 字段 | 类型 | 说明 |
//! |------|------|------|
//! | config | Arc<Config> | 配置项 (不可变) |
//! | registry | Arc<TableRegistry> | 桌台注册表 |
//! | engine | Arc<ReservationEngine> | 预订引擎 |
//! | tokens | CheckinTokenService | 扫码入座令牌服务 |
//! | waiter | Arc<WaiterService> | 前厅聚合视图 |
//! | payments | Arc<PaymentRecorder> | 支付记录 |

use std::sync::Arc;
use std::time::Duration;

use crate::checkin::CheckinTokenService;
use crate::core::Config;
use crate::payments::{MockPaymentGateway, PaymentGateway, PaymentRecorder};
use crate::registry::TableRegistry;
use crate::reservations::ReservationEngine;
use crate::waiter::{HttpOrderClient, OrderClient, WaiterService};

/// 服务器状态
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub registry: Arc<TableRegistry>,
    pub engine: Arc<ReservationEngine>,
    pub tokens: CheckinTokenService,
    pub waiter: Arc<WaiterService>,
    pub payments: Arc<PaymentRecorder>,
}

impl ServerState {
    /// 初始化所有服务
    pub fn initialize(config: &Config) -> Self {
        let orders: Arc<dyn OrderClient> = Arc::new(HttpOrderClient::new(&config.cook_api_url));
        let gateway: Arc<dyn PaymentGateway> = Arc::new(MockPaymentGateway::new(
            Duration::from_millis(config.payment_latency_ms),
            config.paypal_failure_percent,
        ));
        Self::with_collaborators(config, orders, gateway)
    }

    /// 使用自定义协作方构建（测试注入 stub 订单服务 / 网关）
    pub fn with_collaborators(
        config: &Config,
        orders: Arc<dyn OrderClient>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let registry = Arc::new(TableRegistry::new());
        let tokens = CheckinTokenService::new(&config.checkin_secret);
        let engine = Arc::new(ReservationEngine::new(registry.clone(), tokens.clone()));
        let waiter = Arc::new(WaiterService::new(
            engine.clone(),
            registry.clone(),
            orders,
        ));
        let payments = Arc::new(PaymentRecorder::new(
            engine.clone(),
            gateway,
            Duration::from_millis(config.payment_timeout_ms),
        ));

        Self {
            config: Arc::new(config.clone()),
            registry,
            engine,
            tokens,
            waiter,
            payments,
        }
    }
}
