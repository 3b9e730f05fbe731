use crate::k8s::client::ClusterApi;
use crate::{Result, TaggerError};
use tracing::{debug, info};

/// Looks up the pod named `pod_hostname` and returns the node it runs on.
///
/// An empty hostname is rejected before the API is contacted. The node is
/// not checked for existence.
pub async fn resolve_node_name<C: ClusterApi + ?Sized>(
    api: &C,
    pod_hostname: &str,
    namespace: &str,
) -> Result<String> {
    if pod_hostname.is_empty() {
        return Err(TaggerError::ConfigError(
            "Environment variable 'HOSTNAME' not found".to_string(),
        ));
    }

    debug!("Resolving node for pod {}/{}", namespace, pod_hostname);
    let pod = api.get_pod(pod_hostname, namespace).await?;

    let node_name = pod
        .spec
        .and_then(|spec| spec.node_name)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| TaggerError::PodNotScheduled {
            name: pod_hostname.to_string(),
            namespace: namespace.to_string(),
        })?;

    info!("NodeName: {}", node_name);
    Ok(node_name)
}
