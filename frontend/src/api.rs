use std::collections::BTreeMap;
use std::rc::Rc;
use std::str::FromStr;

use log::error;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{ApiError, NetworkError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            other => Err(format!("unsupported method `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Default::default() }
    }

    pub fn post_json<B: Serialize>(url: impl Into<String>, body: &B) -> Result<Self, NetworkError> {
        Ok(Self {
            url: url.into(),
            method: Method::Post,
            body: Some(serde_json::to_string(body)?),
            ..Default::default()
        })
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Options object accepted from page scripts, `{ method, headers, body }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    pub method: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn into_request(self, url: &str) -> Result<ApiRequest, ApiError> {
        let method = match self.method {
            Some(m) => m.parse().map_err(ApiError::InvalidRequest)?,
            None => Method::Get,
        };
        Ok(ApiRequest {
            url: url.to_string(),
            method,
            headers: self.headers.into_iter().collect(),
            body: self.body,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and hands back the status and raw body.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, NetworkError>;
}

/// `Content-Type: application/json` overlaid with the caller's headers.
/// Header names compare case-insensitively and the caller wins.
pub fn merge_headers(caller: &[(String, String)]) -> Vec<(String, String)> {
    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
    for (name, value) in caller {
        match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(existing) => *existing = (name.clone(), value.clone()),
            None => headers.push((name.clone(), value.clone())),
        }
    }
    headers
}

/// Issues `request` and parses the JSON body. Failures are logged and returned.
pub async fn request_json<T, Tr>(transport: &Tr, mut request: ApiRequest) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    Tr: Transport,
{
    request.headers = merge_headers(&request.headers);
    let result = send_and_parse(transport, &request).await;
    if let Err(e) = &result {
        error!("Request to {} failed: {}", request.url, e);
    }
    result
}

async fn send_and_parse<T, Tr>(transport: &Tr, request: &ApiRequest) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    Tr: Transport,
{
    let response = transport.send(request).await?;
    if !response.ok() {
        return Err(ApiError::RequestFailed { status: response.status });
    }
    serde_json::from_str(&response.body).map_err(|e| NetworkError::Parse(e).into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Register,
    Login,
    GoogleAuth,
}

/// Request helper bound to the configured endpoints.
pub struct ApiClient<Tr: Transport> {
    transport: Tr,
    config: Rc<Config>,
}

impl<Tr: Transport> ApiClient<Tr> {
    pub fn new(transport: Tr, config: Rc<Config>) -> Self {
        Self { transport, config }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        let endpoints = &self.config.api_endpoints;
        let path = match endpoint {
            Endpoint::Register => &endpoints.register,
            Endpoint::Login => &endpoints.login,
            Endpoint::GoogleAuth => &endpoints.google_auth,
        };
        format!("{}{}", self.config.backend_url, path)
    }

    pub async fn get<R: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<R, ApiError> {
        request_json(&self.transport, ApiRequest::get(self.url(endpoint))).await
    }

    pub async fn post<B, R>(&self, endpoint: Endpoint, body: &B) -> Result<R, ApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let request = ApiRequest::post_json(self.url(endpoint), body)?;
        request_json(&self.transport, request).await
    }
}
