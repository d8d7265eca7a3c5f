//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 课程目录（公开，默认落地页）
    #[default]
    Home,
    /// 认证入口
    Landing,
    /// 课程页
    Course(String),
    Challenges,
    Profile,
    Leaderboard,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// `path` 可以带查询字符串；`auth_route` 为配置中的认证入口。
    pub fn from_path(path: &str, auth_route: &str) -> Self {
        let bare = split_location(path).0;
        let bare = match bare.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        if bare == auth_route {
            return Self::Landing;
        }

        match bare {
            "/" => Self::Home,
            "/landing" => Self::Landing,
            "/challenges" => Self::Challenges,
            "/profile" => Self::Profile,
            "/leaderboard" => Self::Leaderboard,
            other => match other.strip_prefix("/courses/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Self::Course(id.to_string()),
                _ => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Landing => "/landing".to_string(),
            Self::Course(id) => format!("/courses/{}", id),
            Self::Challenges => "/challenges".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Leaderboard => "/leaderboard".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Course(_) | Self::Challenges | Self::Profile | Self::Leaderboard
        )
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 拆分 `path?search`，search 保留前导 `?`
pub fn split_location(location: &str) -> (&str, &str) {
    let location = location.split('#').next().unwrap_or(location);
    match location.find('?') {
        Some(idx) => location.split_at(idx),
        None => (location, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(AppRoute::from_path("/", "/landing"), AppRoute::Home);
        assert_eq!(
            AppRoute::from_path("/landing?redirect=%2Fprofile", "/landing"),
            AppRoute::Landing
        );
        assert_eq!(
            AppRoute::from_path("/courses/sql", "/landing"),
            AppRoute::Course("sql".into())
        );
        assert_eq!(AppRoute::from_path("/courses/", "/landing"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/login", "/login"), AppRoute::Landing);
        assert_eq!(AppRoute::from_path("/profile/", "/landing"), AppRoute::Profile);
    }

    #[test]
    fn test_protected_routes() {
        assert!(!AppRoute::Home.requires_auth());
        assert!(!AppRoute::Landing.requires_auth());
        assert!(AppRoute::Course("sql".into()).requires_auth());
        assert!(AppRoute::Leaderboard.requires_auth());
    }

    #[test]
    fn test_split_location() {
        assert_eq!(split_location("/landing?redirect=/x"), ("/landing", "?redirect=/x"));
        assert_eq!(split_location("/profile#top"), ("/profile", ""));
    }
}
