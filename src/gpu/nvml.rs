//! NVIDIA Management Library (NVML) handle

use crate::gpu::collector::{DeviceLibrary, DeviceSource};
use crate::gpu::types::{GpuInfo, Memory};
use crate::{Result, TaggerError};
use nvml_wrapper::Nvml;
use std::ffi::OsStr;
use std::fmt::Display;
use tracing::{debug, info, warn};

const NVML_LIB_PATH: &str = "libnvidia-ml.so.1";

/// An initialized NVML session.
///
/// NVML is shut down by [`DeviceLibrary::close`], or on drop if the handle is
/// abandoned on an error path.
pub struct GpuLibrary {
    nvml: Nvml,
}

impl GpuLibrary {
    pub fn open() -> Result<Self> {
        let nvml = match Nvml::init() {
            Ok(nvml) => nvml,
            Err(e) => {
                warn!(
                    "Standard NVML init failed ({}), trying with explicit library path",
                    e
                );
                Nvml::builder()
                    .lib_path(OsStr::new(NVML_LIB_PATH))
                    .init()
                    .map_err(|retry| init_failure(e, retry))?
            }
        };

        info!("NVML initialized successfully");
        Ok(Self { nvml })
    }
}

impl DeviceLibrary for GpuLibrary {
    fn close(self) -> Result<()> {
        self.nvml.shutdown()?;
        debug!("NVML shut down");
        Ok(())
    }
}

fn init_failure(first: impl Display, retry: impl Display) -> TaggerError {
    TaggerError::DeviceError(format!(
        "{} (retry with {} failed: {})",
        first, NVML_LIB_PATH, retry
    ))
}

impl DeviceSource for GpuLibrary {
    fn device_count(&self) -> Result<u32> {
        Ok(self.nvml.device_count()?)
    }

    fn device_info(&self, index: u32) -> Result<GpuInfo> {
        let device = self.nvml.device_by_index(index)?;
        let uuid = device.uuid()?;
        let name = device.name()?;
        let memory = device.memory_info()?;

        Ok(GpuInfo {
            uuid,
            name,
            memory: Memory::from_bytes(memory.total, memory.used, memory.free),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_failure_keeps_both_errors() {
        let err = init_failure("Driver Not Loaded", "a libloading error occurred");

        match err {
            TaggerError::DeviceError(msg) => {
                assert!(msg.starts_with("Driver Not Loaded"));
                assert!(msg.contains(NVML_LIB_PATH));
                assert!(msg.contains("a libloading error occurred"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
