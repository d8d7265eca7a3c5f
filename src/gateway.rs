//! 认证请求网关
//!
//! 所有对远程 API 的调用都经过这里：
//! - 受保护的请求先检查会话，没有会话则不发请求
//! - 每个受保护请求都显式带上 `Authorization: Bearer <token>`
//! - 受保护请求收到 401 时清除会话，并以 `Unauthorized` 通知调用方跳转
//! - 其他错误只转换成 `ApiError`，不动会话

use brickwall_shared::protocol::ApiRequest;
use brickwall_shared::{CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpRequest};
use crate::session::{KeyValueStore, Session, SessionStore};

/// 认证请求网关
///
/// HTTP 客户端通过构造参数注入，不依赖任何全局默认请求头。
pub struct Gateway<C, S> {
    client: C,
    session: SessionStore<S>,
    config: ClientConfig,
}

impl<C: HttpClient, S: KeyValueStore> Gateway<C, S> {
    pub fn new(client: C, storage: S, config: ClientConfig) -> Self {
        Self {
            client,
            session: SessionStore::new(storage),
            config,
        }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// 发送一个类型化请求并解码响应体
    pub async fn send<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let path = request.path();
        let op = format!("{} {}", R::METHOD.as_str(), path);

        let session = if R::PROTECTED {
            let session = self.session.load();
            if !session.is_active() {
                // 没有会话：不发出任何请求
                log_warn!("[Gateway] {} skipped: no session", op);
                return Err(ApiError::unauthorized().in_op(op));
            }
            Some(session)
        } else {
            None
        };

        let req = self
            .build_request(request, &path, session.as_ref())
            .map_err(|e| e.in_op(op.clone()))?;

        let resp = self
            .client
            .send(req)
            .await
            .map_err(|e| ApiError::from(e).in_op(op.clone()))?;

        if !resp.ok() {
            let err = ApiError::from_response(resp.status, &resp.body, R::PROTECTED).in_op(op);
            if err.is_unauthorized() {
                log_warn!("[Gateway] {} returned 401, clearing session", err.spans().join(" -> "));
                self.session.clear();
            } else {
                log_error!("[Gateway] {}", err);
            }
            return Err(err);
        }

        resp.json::<R::Response>()
            .map_err(|e| ApiError::decode(resp.status, e.to_string()).in_op(op))
    }

    fn build_request<R: ApiRequest>(
        &self,
        request: &R,
        path: &str,
        session: Option<&Session>,
    ) -> ApiResult<HttpRequest> {
        let mut req = HttpRequest::new(&self.config.url(path), R::METHOD);

        if let Some(bearer) = session.and_then(Session::bearer) {
            req = req.with_header(HEADER_AUTHORIZATION, &bearer);
        }

        if let Some(body) = request.body() {
            req = req
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_json(body)
                .map_err(|e| ApiError::decode(0, e.to_string()))?;
        }

        Ok(req)
    }
}
