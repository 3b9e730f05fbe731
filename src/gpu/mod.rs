//! GPU inventory collection and annotation flattening
//!
//! Devices are read through NVML once per run, converted to MiB and
//! aggregated into an [`Inventory`], which is then flattened into
//! annotation key/value pairs.

pub mod collector;
pub mod flatten;
pub mod nvml;
pub mod types;

pub use collector::{collect, collect_from, collect_with, DeviceLibrary, DeviceSource};
pub use flatten::{flatten, Flatten};
pub use nvml::GpuLibrary;
pub use types::{GpuInfo, Inventory, Memory, MIB};
