use crate::gpu::nvml::GpuLibrary;
use crate::gpu::types::{GpuInfo, Inventory};
use crate::Result;
use tracing::{debug, info};

/// Enumerates GPU devices by index.
pub trait DeviceSource {
    fn device_count(&self) -> Result<u32>;

    fn device_info(&self, index: u32) -> Result<GpuInfo>;
}

/// A [`DeviceSource`] backed by a library session that must be released.
pub trait DeviceLibrary: DeviceSource + Sized {
    fn close(self) -> Result<()>;
}

/// Reads every device exposed by `source` into an [`Inventory`].
///
/// A failure reading any single device aborts the whole collection.
pub fn collect_from<S: DeviceSource + ?Sized>(source: &S) -> Result<Inventory> {
    let count = source.device_count()?;
    info!("Discovered {} GPU device(s)", count);

    let mut devices = Vec::with_capacity(count as usize);
    for index in 0..count {
        let info = source.device_info(index)?;
        debug!(
            "Found GPU {}: {} ({}), memory total={}MiB used={}MiB free={}MiB",
            index, info.uuid, info.name, info.memory.total, info.memory.used, info.memory.free
        );
        devices.push(info);
    }

    Ok(Inventory::from_devices(devices))
}

/// Opens NVML, collects the host inventory and shuts NVML down again.
pub fn collect() -> Result<Inventory> {
    collect_with(GpuLibrary::open)
}

/// Opens a library session, collects from it and closes it, whether or not
/// collection succeeded. A collection error takes precedence over a close
/// error.
pub fn collect_with<L, F>(open: F) -> Result<Inventory>
where
    L: DeviceLibrary,
    F: FnOnce() -> Result<L>,
{
    let library = open()?;
    let inventory = collect_from(&library);
    let closed = library.close();

    let inventory = inventory?;
    closed?;
    Ok(inventory)
}
