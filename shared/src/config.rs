use std::env;

pub const DEFAULT_TABLE_NAME: &str = "task_cl";
pub const DEFAULT_BUCKET_NAME: &str = "task_bk";
pub const DEFAULT_REGION: &str = "ap-southeast-1";
const MEMORY_IMAGE_BASE_URL: &str = "http://localhost:9000/task_bk";

/// Which storage the service talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// DynamoDB + S3
    Aws,
    /// In-process stores, for local runs
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub table_name: String,
    pub bucket_name: String,
    pub region: String,
    pub public_base_url: Option<String>,
    pub cors_allow_origin: String,
    pub backend: Backend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            bucket_name: DEFAULT_BUCKET_NAME.to_string(),
            region: DEFAULT_REGION.to_string(),
            public_base_url: None,
            cors_allow_origin: "*".to_string(),
            backend: Backend::Aws,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let backend = match get("TASKBOARD_BACKEND").as_deref() {
            Some("memory") => Backend::Memory,
            Some("aws") | None => Backend::Aws,
            Some(other) => {
                tracing::warn!("Unknown TASKBOARD_BACKEND '{}', using aws", other);
                Backend::Aws
            }
        };

        Self {
            table_name: get("TABLE_NAME").unwrap_or(defaults.table_name),
            bucket_name: get("S3_BUCKET_NAME").unwrap_or(defaults.bucket_name),
            region: get("AWS_REGION").unwrap_or(defaults.region),
            public_base_url: get("PUBLIC_BASE_URL"),
            cors_allow_origin: get("CORS_ALLOW_ORIGIN").unwrap_or(defaults.cors_allow_origin),
            backend,
        }
    }

    /// Base URL the in-memory image store hands out
    pub fn memory_image_base_url(&self) -> String {
        self.public_base_url
            .clone()
            .unwrap_or_else(|| MEMORY_IMAGE_BASE_URL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[]));

        assert_eq!(config.table_name, "task_cl");
        assert_eq!(config.bucket_name, "task_bk");
        assert_eq!(config.region, "ap-southeast-1");
        assert_eq!(config.public_base_url, None);
        assert_eq!(config.cors_allow_origin, "*");
        assert_eq!(config.backend, Backend::Aws);
    }

    #[test]
    fn reads_overrides_and_ignores_blank_values() {
        let config = Config::from_lookup(lookup(&[
            ("TABLE_NAME", "tasks-prod"),
            ("S3_BUCKET_NAME", "  "),
            ("PUBLIC_BASE_URL", "https://cdn.example.com"),
            ("TASKBOARD_BACKEND", "memory"),
        ]));

        assert_eq!(config.table_name, "tasks-prod");
        assert_eq!(config.bucket_name, "task_bk");
        assert_eq!(config.public_base_url.as_deref(), Some("https://cdn.example.com"));
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.memory_image_base_url(), "https://cdn.example.com");
    }
}
