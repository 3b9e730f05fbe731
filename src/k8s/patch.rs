//! JSON patch (RFC 6902) documents for node annotations

use crate::gpu::flatten::{flatten, Flatten};
use crate::k8s::client::ClusterApi;
use crate::Result;
use k8s_openapi::api::core::v1::Node;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

pub const ANNOTATIONS_PATH: &str = "/metadata/annotations";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add {
        path: String,
        value: BTreeMap<String, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PatchDocument(Vec<PatchOperation>);

impl PatchDocument {
    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }

    /// Number of annotations the document writes.
    pub fn annotation_count(&self) -> usize {
        self.0
            .iter()
            .map(|op| match op {
                PatchOperation::Add { value, .. } => value.len(),
            })
            .sum()
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_patch(&self) -> Result<json_patch::Patch> {
        Ok(serde_json::from_value(self.to_json()?)?)
    }
}

/// Builds a single `add` operation writing the flattened `value` to the
/// node's annotations, every key under `<prefix>/`.
///
/// `add` on an existing `/metadata/annotations` member replaces the whole
/// object, so annotations not produced here are dropped by the API server.
pub fn build_patch<T: Flatten + ?Sized>(prefix: &str, value: &T) -> PatchDocument {
    PatchDocument(vec![PatchOperation::Add {
        path: ANNOTATIONS_PATH.to_string(),
        value: flatten(prefix, value),
    }])
}

/// Sends `patch` against `node_name` in a single request.
pub async fn send<C: ClusterApi + ?Sized>(
    api: &C,
    patch: &PatchDocument,
    node_name: &str,
) -> Result<Node> {
    info!(
        "Patching node {} with {} annotation(s)",
        node_name,
        patch.annotation_count()
    );

    let node = api.patch_node(node_name, patch).await?;

    info!("Successfully annotated node {}", node_name);
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::types::{GpuInfo, Inventory, Memory};
    use serde_json::json;

    fn inventory() -> Inventory {
        Inventory::from_devices(vec![GpuInfo {
            uuid: "GPU-5f2b7e8a".to_string(),
            name: "NVIDIA L4".to_string(),
            memory: Memory::new(23034, 1, 23033),
        }])
    }

    #[test]
    fn test_patch_wire_format() {
        let patch = build_patch("example.com", &inventory());

        let expected = json!([{
            "op": "add",
            "path": "/metadata/annotations",
            "value": {
                "example.com/device.0.uuid": "GPU-5f2b7e8a",
                "example.com/device.0.name": "NVIDIA L4",
                "example.com/device.0.memory.total": "23034",
                "example.com/device.0.memory.used": "1",
                "example.com/device.0.memory.free": "23033",
                "example.com/sum.memory.total": "23034",
                "example.com/sum.memory.used": "1",
                "example.com/sum.memory.free": "23033"
            }
        }]);

        assert_eq!(patch.to_json().expect("serialize patch"), expected);
        assert_eq!(patch.annotation_count(), 8);
    }

    #[test]
    fn test_single_add_operation() {
        let patch = build_patch("p", &Inventory::default());

        assert_eq!(patch.operations().len(), 1);
        match &patch.operations()[0] {
            PatchOperation::Add { path, value } => {
                assert_eq!(path, ANNOTATIONS_PATH);
                assert_eq!(value.len(), 3);
            }
        }
    }

    #[test]
    fn test_converts_to_json_patch() {
        let patch = build_patch("p", &inventory());

        let json_patch = patch.to_json_patch().expect("valid json patch");

        assert_eq!(json_patch.0.len(), 1);
        assert_eq!(
            serde_json::to_value(&json_patch).expect("serialize json patch"),
            patch.to_json().expect("serialize patch")
        );
    }

    #[test]
    fn test_applies_to_node_document() {
        let patch = build_patch("p", &inventory()).to_json_patch().expect("valid");
        let mut node = json!({
            "metadata": { "name": "gpu-node-1", "annotations": { "old": "value" } }
        });

        json_patch::patch(&mut node, &patch.0).expect("patch applies");

        let annotations = &node["metadata"]["annotations"];
        assert_eq!(annotations["p/device.0.uuid"], "GPU-5f2b7e8a");
        assert_eq!(annotations["p/sum.memory.free"], "23033");
        assert!(annotations.get("old").is_none());
    }
}
