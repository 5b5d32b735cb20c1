use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub admin_username: String,
    pub admin_password: String,
    /// Argon2 PHC string; when set, `admin_password` is ignored.
    pub admin_password_hash: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://clinica.db".to_string());

        let bind_addr = match lookup("BIND_ADDR") {
            Some(addr) => addr,
            None => {
                let port = match lookup("PORT") {
                    Some(p) => p
                        .trim()
                        .parse::<u16>()
                        .map_err(|e| anyhow::anyhow!("invalid PORT {p:?}: {e}"))?,
                    None => 3000,
                };
                format!("0.0.0.0:{port}")
            }
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(n) => match n.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => anyhow::bail!("invalid DB_MAX_CONNECTIONS {n:?}: expected a positive integer"),
            },
            None => 5,
        };

        let admin_username = lookup("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string());
        let admin_password = lookup("ADMIN_PASSWORD").unwrap_or_else(|| "1234".to_string());
        let admin_password_hash = lookup("ADMIN_PASSWORD_HASH").filter(|s| !s.trim().is_empty());

        Ok(Self {
            database_url,
            bind_addr,
            db_max_connections,
            admin_username,
            admin_password,
            admin_password_hash,
        })
    }
}
