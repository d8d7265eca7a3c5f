//! 浏览器 HTTP 客户端
//!
//! 基于 `gloo-net` 的 fetch 封装，实现核心库的 `HttpClient` 接口。
//! 只负责传输：状态码和响应体原样交给网关处理。

use brickwall::{HttpClient, HttpRequest, HttpResponse, TransportError};
use brickwall_shared::protocol::HttpMethod;
use gloo_net::http::{Request, RequestBuilder};

/// fetch 客户端，无状态
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

fn builder_for(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = builder_for(req.method, &req.url);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError(format!("请求构建失败: {}", e)))?;

        let resp = request
            .send()
            .await
            .map_err(|e| TransportError(format!("网络错误: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError(format!("响应读取失败: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}
