// =========================================================
// 客户端配置 (Client Configuration)
// =========================================================

/// 这些是默认值，如果环境中没有定义对应变量，则使用这些值
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_AUTH_ROUTE: &str = "/landing";
pub const DEFAULT_HOME_ROUTE: &str = "/";

pub const ENV_API_URL: &str = "BRICKWALL_API_URL";
pub const ENV_AUTH_ROUTE: &str = "BRICKWALL_AUTH_ROUTE";
pub const ENV_HOME_ROUTE: &str = "BRICKWALL_HOME_ROUTE";

/// 配置变量来源
///
/// 浏览器里没有进程环境变量，只能使用构建时注入的值。
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// 构建时通过 `option_env!` 注入的变量
pub struct BuildEnv;

impl EnvSource for BuildEnv {
    fn var(&self, name: &str) -> Option<String> {
        let value = match name {
            ENV_API_URL => option_env!("BRICKWALL_API_URL"),
            ENV_AUTH_ROUTE => option_env!("BRICKWALL_AUTH_ROUTE"),
            ENV_HOME_ROUTE => option_env!("BRICKWALL_HOME_ROUTE"),
            _ => None,
        };
        value.map(str::to_string)
    }
}

/// 客户端运行时配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 远程 API 根地址（不带结尾的 `/`）
    pub api_base_url: String,
    /// 认证入口路由
    pub auth_route: String,
    /// 登录成功且没有 redirect 参数时的默认落地页
    pub home_route: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            auth_route: DEFAULT_AUTH_ROUTE.to_string(),
            home_route: DEFAULT_HOME_ROUTE.to_string(),
        }
    }

    /// 从变量来源读取配置，读不到或为空时使用默认值
    pub fn from_env<E: EnvSource>(env: &E) -> Self {
        let read = |name: &str, default: &str| {
            env.var(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            api_base_url: read(ENV_API_URL, DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            auth_route: read(ENV_AUTH_ROUTE, DEFAULT_AUTH_ROUTE),
            home_route: read(ENV_HOME_ROUTE, DEFAULT_HOME_ROUTE),
        }
    }

    /// 拼接 API 地址
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}
