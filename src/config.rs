//! 서비스 설정
//! 환경 변수에서 읽어오는 실행 설정과 도메인 제한 상수
// region:    --- Imports
use std::str::FromStr;
// endregion: --- Imports

// region:    --- Limits
/// 상품 제목 최대 길이
pub const TITLE_MAX_LEN: usize = 64;

/// 상품 설명 최대 길이
pub const DESCRIPTION_MAX_LEN: usize = 240;

/// 이미지 URL 최대 길이
pub const IMAGE_URL_MAX_LEN: usize = 200;

/// 댓글 최대 길이
pub const COMMENT_MAX_LEN: usize = 500;

/// 사용자 이름 최대 길이
pub const USERNAME_MAX_LEN: usize = 150;

/// 입찰 금액 상한 (NUMERIC(10, 2))
pub const AMOUNT_UPPER_BOUND: i64 = 100_000_000;

/// 요청 바디 최대 크기 (1MB)
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;
// endregion: --- Limits

// region:    --- Config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} 환경 변수가 설정되지 않았습니다.")]
    Missing(&'static str),

    #[error("{name} 값이 올바르지 않습니다: {value}")]
    Invalid { name: &'static str, value: String },
}

/// 저장소 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid {
                name: "AUCTION_STORE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl AppConfig {
    /// 환경 변수에서 설정 읽기
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("AUCTION_STORE") {
            Some(value) => value.parse()?,
            None => StoreBackend::Postgres,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if store == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "DB_MAX_CONNECTIONS",
                        value,
                    })
                }
            },
            None => 5,
        };

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        Ok(Self {
            bind_addr,
            store,
            database_url,
            max_connections,
        })
    }
}
// endregion: --- Config
