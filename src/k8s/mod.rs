pub mod client;
pub mod patch;
pub mod resolver;

pub use client::{ClientOptions, ClusterApi, K8sClient};
pub use patch::{build_patch, send, PatchDocument, PatchOperation, ANNOTATIONS_PATH};
pub use resolver::resolve_node_name;
