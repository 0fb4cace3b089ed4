use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub token_max_age_secs: u64,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .unwrap_or_else(|_| "2h".into())
            .trim_end_matches('h')
            .parse::<u64>()
            .unwrap_or(2);
        let token_max_age = env::var("TOKEN_MAX_AGE")
            .unwrap_or_else(|_| "2h".into())
            .trim_end_matches('h')
            .parse::<u64>()
            .unwrap_or(2);
        Ok(Config {
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_expiration_secs: jwt_expiration * 3600,
            token_max_age_secs: token_max_age * 3600,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    /// 令牌新鲜度窗口，签发时间早于该窗口的令牌一律拒绝
    pub fn token_max_age(&self) -> Duration {
        Duration::from_secs(self.token_max_age_secs)
    }
}
