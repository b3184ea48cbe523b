use crate::domain::model::{
    AdjustedCbRoute, ApplyResult, BankingResult, ComparisonData, ComplianceBalance,
    CreatePoolRequest, ErrorBody, MessageResponse, PoolResult, Route,
};
use crate::utils::error::{FleetError, Result};
use crate::utils::validation::validate_url;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// marine-fleet HTTP API 的型別化客戶端
#[derive(Debug, Clone)]
pub struct FleetClient {
    base_url: Url,
    client: Client,
}

impl FleetClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:3001/api`.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        validate_url("base_url", base_url)?;
        let base_url = Url::parse(base_url).map_err(|e| invalid_base_url(base_url, &e.to_string()))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// 以路徑片段組出 URL；每個片段都會被百分比編碼，`/`、`?`、`#` 不會改變路徑結構
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| invalid_base_url(self.base_url.as_str(), "URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        // 伺服器錯誤格式為 {message, statusCode}；其他內容原樣帶回
        let message = match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(body) => body.message,
            Err(_) => String::from_utf8_lossy(&bytes).trim().to_string(),
        };
        tracing::debug!("API error {}: {}", status, message);

        Err(FleetError::ApiResponseError {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn get_routes(&self) -> Result<Vec<Route>> {
        self.send(self.request(Method::GET, &["routes"])?).await
    }

    pub async fn set_baseline(&self, route_id: &str) -> Result<MessageResponse> {
        let request = self.request(Method::POST, &["routes", route_id, "baseline"])?;
        self.send(request).await
    }

    pub async fn get_comparison(&self) -> Result<ComparisonData> {
        self.send(self.request(Method::GET, &["routes", "comparison"])?)
            .await
    }

    pub async fn get_compliance_balance(&self, year: i32) -> Result<ComplianceBalance> {
        let request = self
            .request(Method::GET, &["compliance", "cb"])?
            .query(&[("year", year)]);
        self.send(request).await
    }

    pub async fn bank_surplus(&self, year: i32) -> Result<BankingResult> {
        let request = self
            .request(Method::POST, &["banking", "bank"])?
            .query(&[("year", year)]);
        self.send(request).await
    }

    pub async fn apply_banked_surplus(&self, year: i32) -> Result<ApplyResult> {
        let request = self
            .request(Method::POST, &["banking", "apply"])?
            .query(&[("year", year)]);
        self.send(request).await
    }

    pub async fn get_adjusted_cbs(&self, year: i32) -> Result<Vec<AdjustedCbRoute>> {
        let request = self
            .request(Method::GET, &["compliance", "adjusted-cb"])?
            .query(&[("year", year)]);
        self.send(request).await
    }

    pub async fn create_pool(&self, route_ids: Vec<String>, year: i32) -> Result<PoolResult> {
        let body = CreatePoolRequest { route_ids, year };
        let request = self.request(Method::POST, &["pools"])?.json(&body);
        self.send(request).await
    }
}

fn invalid_base_url(value: &str, reason: &str) -> FleetError {
    FleetError::InvalidConfigValueError {
        field: "base_url".to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments_with_or_without_trailing_slash() {
        for base in ["http://localhost:3001/api", "http://localhost:3001/api/"] {
            let client = FleetClient::new(base).unwrap();
            assert_eq!(
                client.endpoint(&["routes", "comparison"]).unwrap().as_str(),
                "http://localhost:3001/api/routes/comparison"
            );
        }

        let client = FleetClient::new("http://localhost:3001").unwrap();
        assert_eq!(
            client.endpoint(&["routes"]).unwrap().as_str(),
            "http://localhost:3001/routes"
        );
    }

    #[test]
    fn test_route_id_is_percent_encoded() {
        let client = FleetClient::new("http://localhost:3001/api/").unwrap();
        let url = client.endpoint(&["routes", "R/1?x#y", "baseline"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/api/routes/R%2F1%3Fx%23y/baseline"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }
}
