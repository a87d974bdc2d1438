use serde::{Deserialize, Serialize};

/// `modules.api_ingress` section. The listen address comes from `server.host`/`server.port`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ApiIngressConfig {
    pub enable_docs: bool,
    pub cors_enabled: bool,
    /// 0 disables the handler timeout.
    pub request_timeout_secs: u64,
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            enable_docs: true,
            cors_enabled: false,
            request_timeout_secs: 30,
            body_limit_bytes: 16 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let cfg: ApiIngressConfig =
            serde_json::from_value(serde_json::json!({ "cors_enabled": true })).unwrap();
        assert!(cfg.cors_enabled);
        assert!(cfg.enable_docs);
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<ApiIngressConfig, _> =
            serde_json::from_value(serde_json::json!({ "bind_addr": "0.0.0.0:80" }));
        assert!(res.is_err());
    }
}
