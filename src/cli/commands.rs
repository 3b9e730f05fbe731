use crate::cli::Cli;
use crate::gpu::{self, Inventory};
use crate::k8s::{build_patch, resolve_node_name, send, ClusterApi, K8sClient};
use crate::Result;
use k8s_openapi::api::core::v1::Node;
use tracing::info;

pub async fn handle_run(cli: Cli) -> Result<()> {
    let client = K8sClient::from_options(&cli.client_options()).await?;
    tag_node(&client, &cli, gpu::collect).await?;
    Ok(())
}

/// Resolves this pod's node, collects the GPU inventory and annotates the
/// node with it. Returns `None` on a dry run.
pub async fn tag_node<C, F>(api: &C, cli: &Cli, collect: F) -> Result<Option<Node>>
where
    C: ClusterApi + ?Sized,
    F: FnOnce() -> Result<Inventory>,
{
    let node_name = resolve_node_name(api, &cli.pod_name, &cli.namespace).await?;

    let inventory = collect()?;
    info!(
        "Collected {} GPU(s), {} MiB total memory",
        inventory.len(),
        inventory.memory_sum().total
    );

    let patch = build_patch(&cli.labels_prefix, &inventory);

    if cli.dry_run {
        info!("Dry run, not patching node {}", node_name);
        println!("{}", patch.to_pretty_json()?);
        return Ok(None);
    }

    let node = send(api, &patch, &node_name).await?;
    Ok(Some(node))
}
