//! 重定向解析
//!
//! 未登录用户访问受保护资源时，被送往 `<auth_route>?redirect=<原路径>`；
//! 认证成功后回到该路径，没有参数时回到默认落地页。
//! `redirect` 参数只消费一次，不做持久化。

use brickwall_shared::REDIRECT_PARAM;
use url::form_urlencoded;

/// 只接受站内路径：以 `/` 开头，且不是 `//host` 或 `/\host` 这类协议相对地址
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

/// 从查询字符串（可带或不带前导 `?`）中取出 `redirect` 参数
pub fn redirect_param(search: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// 认证成功后的目标地址
///
/// 有合法的 `redirect` 参数则跳过去，否则回到默认落地页。
pub fn resolve_redirect(search: &str, default_route: &str) -> String {
    match redirect_param(search) {
        Some(target) if is_local_path(&target) => target,
        Some(target) => {
            log_warn!("[Redirect] Ignoring non-local redirect target {}", target);
            default_route.to_string()
        }
        None => default_route.to_string(),
    }
}

/// 构造认证入口地址
///
/// `from` 为当前页面路径；为空、不是站内路径或本身就是认证入口时不附带参数。
pub fn auth_entry_path(auth_route: &str, from: Option<&str>) -> String {
    match from {
        Some(from) if is_local_path(from) && !is_auth_route(auth_route, from) => {
            let query: String = form_urlencoded::Serializer::new(String::new())
                .append_pair(REDIRECT_PARAM, from)
                .finish();
            format!("{}?{}", auth_route, query)
        }
        _ => auth_route.to_string(),
    }
}

fn is_auth_route(auth_route: &str, path: &str) -> bool {
    let bare = path.split(['?', '#']).next().unwrap_or(path);
    bare == auth_route
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_param_wins_over_default() {
        assert_eq!(resolve_redirect("?redirect=/courses/abc", "/"), "/courses/abc");
        assert_eq!(resolve_redirect("redirect=%2Fcourses%2Fabc", "/"), "/courses/abc");
    }

    #[test]
    fn test_default_when_missing_or_empty() {
        assert_eq!(resolve_redirect("", "/"), "/");
        assert_eq!(resolve_redirect("?foo=bar", "/"), "/");
        assert_eq!(resolve_redirect("?redirect=", "/"), "/");
    }

    #[test]
    fn test_external_targets_are_ignored() {
        assert_eq!(resolve_redirect("?redirect=https://evil.example", "/"), "/");
        assert_eq!(resolve_redirect("?redirect=//evil.example", "/"), "/");
        assert_eq!(resolve_redirect("?redirect=/%5Cevil.example", "/"), "/");
    }

    #[test]
    fn test_auth_entry_path_round_trips() {
        let entry = auth_entry_path("/landing", Some("/courses/sql"));
        assert_eq!(entry, "/landing?redirect=%2Fcourses%2Fsql");

        let search = entry.split_once('?').map(|(_, q)| q).unwrap();
        assert_eq!(resolve_redirect(search, "/"), "/courses/sql");
    }

    #[test]
    fn test_auth_entry_without_origin() {
        assert_eq!(auth_entry_path("/landing", None), "/landing");
        assert_eq!(auth_entry_path("/landing", Some("/landing?redirect=/x")), "/landing");
        assert_eq!(auth_entry_path("/landing", Some("https://x")), "/landing");
    }
}
