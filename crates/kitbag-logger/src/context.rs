//! Deployment metadata attached to every log event

use serde::Serialize;

/// Process-wide fields resolved once when the logger is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalContext {
    pub host: String,
    pub service_name: Option<String>,
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub region: Option<String>,
    pub runtime: String,
}

impl GlobalContext {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the context from an arbitrary variable lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let host = get("K_REVISION")
            .or_else(|| get("AWS_LAMBDA_FUNCTION_NAME"))
            .unwrap_or_else(machine_hostname);

        Self {
            host,
            service_name: get("SERVICE_NAME"),
            stage: get("STAGE"),
            version: get("SERVICE_VERSION"),
            region: get("REGION").or_else(|| get("AWS_REGION")),
            runtime: runtime_from(get("AWS_EXECUTION_ENV")),
        }
    }
}

fn machine_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "localhost".to_string())
}

/// Identify the runtime this process runs on.
pub fn detect_runtime() -> String {
    runtime_from(std::env::var("AWS_EXECUTION_ENV").ok().filter(|v| !v.is_empty()))
}

fn runtime_from(execution_env: Option<String>) -> String {
    match execution_env {
        Some(env) => env.replace('_', "-"),
        None => format!("rust-{}-{}", std::env::consts::OS, std::env::consts::ARCH),
    }
}
