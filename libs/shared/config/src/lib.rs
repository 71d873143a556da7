use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_key: Option<String>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY").ok()
                .filter(|key| !key.is_empty()),
            port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or_else(|| {
                    warn!("PORT not set or invalid, using default 3000");
                    3000
                }),
        };
        
        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }
        
        config
    }
    
    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() 
            && !self.supabase_anon_key.is_empty()
    }

    /// Token sent as the bearer credential to the REST gateway.
    pub fn bearer_token(&self) -> &str {
        self.supabase_service_key
            .as_deref()
            .unwrap_or(&self.supabase_anon_key)
    }
}
