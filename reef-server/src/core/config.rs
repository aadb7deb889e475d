/// 服务器配置 - 预订协调节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 8083 | HTTP 服务端口 |
/// | CHECKIN_TOKEN_SECRET | (开发密钥) | 扫码入座令牌签名密钥 |
/// | CHECKIN_BASE_URL | http://localhost:8083 | 二维码跳转的基础地址 |
/// | COOK_API_URL | http://localhost:8081 | 厨房订单服务地址 |
/// | SWEEP_INTERVAL_SECS | 60 | 预订巡检周期（秒） |
/// | PAYMENT_LATENCY_MS | 2000 | 模拟支付网关延迟（毫秒） |
/// | PAYMENT_TIMEOUT_MS | 10000 | 支付调用超时（毫秒） |
/// | PAYPAL_FAILURE_PERCENT | 5 | PayPal 模拟失败率（百分比） |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=9000 COOK_API_URL=http://cook:8081 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 扫码入座令牌签名密钥
    pub checkin_secret: String,
    /// 二维码跳转的基础地址
    pub checkin_base_url: String,
    /// 厨房订单服务地址
    pub cook_api_url: String,
    /// 预订巡检周期（秒）
    pub sweep_interval_secs: u64,
    /// 模拟支付网关延迟（毫秒）
    pub payment_latency_ms: u64,
    /// 支付调用超时（毫秒）
    pub payment_timeout_ms: u64,
    /// PayPal 模拟失败率（百分比，0 表示永不失败）
    pub paypal_failure_percent: u32,
    /// 运行环境: development | staging | production
    pub environment: String,
}

const DEV_CHECKIN_SECRET: &str = "reef-dev-secret-change-in-production";

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let checkin_secret = match std::env::var("CHECKIN_TOKEN_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                if environment == "production" {
                    tracing::error!(
                        "CHECKIN_TOKEN_SECRET not set in production; QR tokens will not survive redeploys"
                    );
                } else {
                    tracing::warn!("CHECKIN_TOKEN_SECRET not set, using development key");
                }
                DEV_CHECKIN_SECRET.to_string()
            }
        };

        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8083),
            checkin_secret,
            checkin_base_url: std::env::var("CHECKIN_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8083".into()),
            cook_api_url: std::env::var("COOK_API_URL")
                .unwrap_or_else(|_| "http://localhost:8081".into()),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
            payment_latency_ms: std::env::var("PAYMENT_LATENCY_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(2000),
            payment_timeout_ms: std::env::var("PAYMENT_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            paypal_failure_percent: std::env::var("PAYPAL_FAILURE_PERCENT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5),
            environment,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
