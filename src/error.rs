use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("GPU device error: {0}")]
    DeviceError(String),

    #[error("Kubernetes API error: {0}")]
    ApiError(String),

    #[error("Pod {namespace}/{name} has not been scheduled to a node")]
    PodNotScheduled { name: String, namespace: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<nvml_wrapper::error::NvmlError> for TaggerError {
    fn from(e: nvml_wrapper::error::NvmlError) -> Self {
        TaggerError::DeviceError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaggerError>;
