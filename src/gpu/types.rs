use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::Add;

/// Bytes per mebibyte.
pub const MIB: u64 = 1_048_576;

/// Device memory figures in MiB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Memory {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

impl Memory {
    pub fn new(total: u64, used: u64, free: u64) -> Self {
        Self { total, used, free }
    }

    /// Converts raw byte counts to MiB, truncating any remainder.
    pub fn from_bytes(total: u64, used: u64, free: u64) -> Self {
        Self {
            total: total / MIB,
            used: used / MIB,
            free: free / MIB,
        }
    }
}

impl Add for Memory {
    type Output = Memory;

    fn add(self, other: Memory) -> Memory {
        Memory {
            total: self.total + other.total,
            used: self.used + other.used,
            free: self.free + other.free,
        }
    }
}

impl Sum for Memory {
    fn sum<I: Iterator<Item = Memory>>(iter: I) -> Memory {
        iter.fold(Memory::default(), Add::add)
    }
}

impl<'a> Sum<&'a Memory> for Memory {
    fn sum<I: Iterator<Item = &'a Memory>>(iter: I) -> Memory {
        iter.copied().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuInfo {
    pub uuid: String,
    pub name: String,
    pub memory: Memory,
}

/// All GPUs found on the host, keyed by their enumeration index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    devices: BTreeMap<String, GpuInfo>,
    memory_sum: Memory,
}

impl Inventory {
    /// Builds an inventory from devices in enumeration order.
    pub fn from_devices(devices: Vec<GpuInfo>) -> Self {
        let memory_sum = devices.iter().map(|d| &d.memory).sum();
        let devices = devices
            .into_iter()
            .enumerate()
            .map(|(index, info)| (index.to_string(), info))
            .collect();

        Self {
            devices,
            memory_sum,
        }
    }

    pub fn devices(&self) -> &BTreeMap<String, GpuInfo> {
        &self.devices
    }

    pub fn memory_sum(&self) -> Memory {
        self.memory_sum
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
