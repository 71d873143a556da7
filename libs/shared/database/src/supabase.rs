use anyhow::{Result, anyhow};
use reqwest::{
    Client, 
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::query::SelectQuery;

#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
    bearer_token: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
            bearer_token: config.bearer_token().to_string(),
        }
    }
    
    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        
        headers.insert("apikey", HeaderValue::from_str(&self.anon_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.bearer_token))?,
        );
        
        Ok(headers)
    }
    
    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T> 
    where T: DeserializeOwned {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);
        
        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }
        
        let mut req = self.client.request(method, &url)
            .headers(headers);
            
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }
        
        let response = req.send().await?;
        
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);
            
            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }
        
        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Runs a select and returns its rows in the order the store produced them.
    pub async fn select<T>(&self, query: &SelectQuery) -> Result<Vec<T>>
    where T: DeserializeOwned {
        self.request(Method::GET, &query.to_path(), None).await
    }

    /// Writes with `Prefer: return=representation` so the affected rows come back.
    pub async fn write_returning<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<Vec<T>>
    where T: DeserializeOwned {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        self.request_with_headers(method, path, body, Some(headers)).await
    }
}
