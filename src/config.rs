use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a cached index page.
    pub index_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub root: PathBuf,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv::dotenv().ok();

        let url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => mysql_url(
                &env_or("MYSQL_HOST", "localhost"),
                env_parse("MYSQL_PORT", 3306),
                &env_or("MYSQL_USER", "root"),
                &env_or("MYSQL_PASSWORD", "password"),
                &env_or("MYSQL_DATABASE", "yatube"),
            ),
        };

        Ok(Config {
            server: ServerConfig {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: env_parse("SERVER_PORT", 8080),
            },
            jwt: JwtConfig {
                secret: env_or("JWT_SECRET", "your-secret-key-change-this"),
                expiration_hours: env_parse("JWT_EXPIRATION_HOURS", 24),
                bcrypt_cost: env_parse("BCRYPT_COST", bcrypt::DEFAULT_COST),
            },
            database: DatabaseConfig {
                url,
                max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10),
            },
            cache: CacheConfig {
                index_seconds: env_parse("INDEX_CACHE_SECONDS", 20),
            },
            media: MediaConfig {
                root: PathBuf::from(env_or("MEDIA_ROOT", "media")),
            },
        })
    }

    pub fn is_sqlite(&self) -> bool {
        self.database.url.starts_with("sqlite:")
    }
}

fn mysql_url(host: &str, port: u16, user: &str, password: &str, database: &str) -> String {
    format!("mysql://{}:{}@{}:{}/{}", user, password, host, port, database)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_mysql_url_from_parts() {
        assert_eq!(
            mysql_url("db", 3307, "blog", "secret", "yatube"),
            "mysql://blog:secret@db:3307/yatube"
        );
    }
}
