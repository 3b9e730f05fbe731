use crate::k8s::patch::PatchDocument;
use crate::{Result, TaggerError};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{Patch, PatchParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use std::path::PathBuf;
use tracing::{debug, info};

/// The Kubernetes calls the tagger needs.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn get_pod(&self, name: &str, namespace: &str) -> Result<Pod>;

    async fn patch_node(&self, node_name: &str, patch: &PatchDocument) -> Result<Node>;
}

/// Where to find cluster credentials.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub kubeconfig: Option<PathBuf>,
    pub master_url: Option<String>,
}

impl ClientOptions {
    /// Builds a client config.
    ///
    /// With a kubeconfig file, its current context is used and `master_url`
    /// only replaces the server address. A bare `master_url` talks to that
    /// address without credentials. With neither, the config is inferred
    /// (in-cluster service account first, then the local kubeconfig).
    pub async fn load_config(&self) -> Result<Config> {
        let master_url = self
            .master_url
            .as_deref()
            .map(expand_env)
            .filter(|url| !url.is_empty());

        let mut config = match (&self.kubeconfig, &master_url) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    TaggerError::ConfigError(format!(
                        "Failed to read kubeconfig file {}: {}",
                        path.display(),
                        e
                    ))
                })?;

                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .map_err(|e| {
                        TaggerError::ConfigError(format!(
                            "Failed to create config from kubeconfig {}: {}",
                            path.display(),
                            e
                        ))
                    })?
            }
            (None, Some(url)) => Config::new(url.parse().map_err(|e| invalid_url(url, e))?),
            (None, None) => Config::infer().await.map_err(|e| {
                TaggerError::ConfigError(format!("Failed to infer Kubernetes config: {}", e))
            })?,
        };

        if let (Some(_), Some(url)) = (&self.kubeconfig, &master_url) {
            config.cluster_url = url.parse().map_err(|e| invalid_url(url, e))?;
        }

        debug!("Using Kubernetes API server {}", config.cluster_url);
        Ok(config)
    }
}

fn invalid_url(url: &str, e: impl std::fmt::Display) -> TaggerError {
    TaggerError::ConfigError(format!("Invalid Kubernetes master URL {}: {}", url, e))
}

/// Expands `$VAR` and `${VAR}` references from the process environment,
/// following shell rules: `$1`, `$-`, `$*` and the other special names are
/// one character long, and malformed `${...}` references are dropped.
/// Unset variables expand to an empty string.
pub fn expand_env(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = shell_name(after);
        match name {
            Some(name) => out.push_str(&lookup(name).unwrap_or_default()),
            None if consumed == 0 => out.push('$'),
            None => {}
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

fn is_special_name(c: char) -> bool {
    matches!(c, '*' | '#' | '$' | '@' | '!' | '?' | '-') || c.is_ascii_digit()
}

/// Returns the variable name at the start of `s` and how many bytes it
/// spans. `(None, n)` with `n > 0` is a malformed reference to discard.
fn shell_name(s: &str) -> (Option<&str>, usize) {
    match s.chars().next() {
        Some('{') => {
            let inner = &s[1..];
            let mut chars = inner.chars();
            if let (Some(c), Some('}')) = (chars.next(), chars.next()) {
                if is_special_name(c) {
                    return (Some(&inner[..1]), 3);
                }
            }
            match inner.find('}') {
                Some(0) => (None, 2),
                Some(end) => (Some(&inner[..end]), end + 2),
                None => (None, 1),
            }
        }
        Some(c) if is_special_name(c) => (Some(&s[..1]), 1),
        _ => {
            let len = s
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(s.len());
            if len == 0 {
                (None, 0)
            } else {
                (Some(&s[..len]), len)
            }
        }
    }
}

pub struct K8sClient {
    client: Client,
}

impl K8sClient {
    pub async fn from_options(options: &ClientOptions) -> Result<Self> {
        debug!("Initializing Kubernetes client");

        let config = options.load_config().await?;
        let client = Client::try_from(config).map_err(|e| {
            TaggerError::ApiError(format!("Failed to create K8s client: {}", e))
        })?;

        info!("Kubernetes client initialized");

        Ok(Self { client })
    }

    pub fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn nodes(&self) -> Api<Node> {
        Api::all(self.client.clone())
    }
}

#[async_trait]
impl ClusterApi for K8sClient {
    async fn get_pod(&self, name: &str, namespace: &str) -> Result<Pod> {
        self.pods(namespace).get(name).await.map_err(|e| {
            TaggerError::ApiError(format!("Failed to get pod {}/{}: {}", namespace, name, e))
        })
    }

    async fn patch_node(&self, node_name: &str, patch: &PatchDocument) -> Result<Node> {
        let patch = Patch::Json::<()>(patch.to_json_patch()?);

        self.nodes()
            .patch(node_name, &PatchParams::default(), &patch)
            .await
            .map_err(|e| {
                TaggerError::ApiError(format!("Failed to patch node {}: {}", node_name, e))
            })
    }
}
