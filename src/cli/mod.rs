pub mod commands;

use crate::k8s::ClientOptions;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_NAMESPACE: &str = "cluster-addons-nvidia-node-tagger";
pub const DEFAULT_PREFIX: &str = "BlueWhaleKo.com";

#[derive(Parser, Debug, Clone)]
#[command(name = "gpu-node-tagger")]
#[command(author = "BlueWhaleKo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Annotates the current Kubernetes node with its NVIDIA GPU inventory", long_about = None)]
pub struct Cli {
    #[arg(
        long = "kubecfg-file",
        help = "Location of kubecfg file for access to the Kubernetes API server; defaults to ServiceAccount tokens"
    )]
    pub kubecfg_file: Option<PathBuf>,

    #[arg(
        long = "kube-master-url",
        help = "URL of the Kubernetes API server; overrides the kubecfg server. Environment variables are expanded"
    )]
    pub kube_master_url: Option<String>,

    #[arg(long, default_value = DEFAULT_NAMESPACE, help = "Namespace the tagger pod runs in")]
    pub namespace: String,

    #[arg(long = "labels-prefix", default_value = DEFAULT_PREFIX, help = "Prefix for node annotation keys")]
    pub labels_prefix: String,

    #[arg(
        long = "pod-name",
        env = "HOSTNAME",
        default_value = "",
        hide_env_values = true,
        help = "Name of the tagger pod"
    )]
    pub pod_name: String,

    #[arg(long, help = "Print the patch instead of sending it")]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}

impl Cli {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            kubeconfig: self.kubecfg_file.clone(),
            master_url: self.kube_master_url.clone(),
        }
    }
}
