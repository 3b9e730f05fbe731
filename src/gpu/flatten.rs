//! Flattens nested structure into dot-joined annotation keys.
//!
//! `device.0.memory.total`-style keys are produced by walking typed values
//! directly; every key is then placed under a `<prefix>/` namespace.

use crate::gpu::types::{GpuInfo, Inventory, Memory};
use std::collections::BTreeMap;

/// A value that can be written out as flat `key -> string` pairs.
///
/// `path` is the dot-joined key of `self`, empty at the root.
pub trait Flatten {
    fn flatten_into(&self, path: &str, out: &mut BTreeMap<String, String>);
}

/// Flattens `value` and prefixes every resulting key with `<prefix>/`.
pub fn flatten<T: Flatten + ?Sized>(prefix: &str, value: &T) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    value.flatten_into("", &mut flat);

    flat.into_iter()
        .map(|(key, value)| (format!("{}/{}", prefix, key), value))
        .collect()
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

macro_rules! impl_flatten_leaf {
    ($($ty:ty),*) => {
        $(
            impl Flatten for $ty {
                fn flatten_into(&self, path: &str, out: &mut BTreeMap<String, String>) {
                    out.insert(path.to_string(), self.to_string());
                }
            }
        )*
    };
}

impl_flatten_leaf!(u64, String, str);

impl<T: Flatten> Flatten for BTreeMap<String, T> {
    fn flatten_into(&self, path: &str, out: &mut BTreeMap<String, String>) {
        for (key, value) in self {
            value.flatten_into(&join(path, key), out);
        }
    }
}

impl Flatten for Memory {
    fn flatten_into(&self, path: &str, out: &mut BTreeMap<String, String>) {
        self.total.flatten_into(&join(path, "total"), out);
        self.used.flatten_into(&join(path, "used"), out);
        self.free.flatten_into(&join(path, "free"), out);
    }
}

impl Flatten for GpuInfo {
    fn flatten_into(&self, path: &str, out: &mut BTreeMap<String, String>) {
        self.uuid.flatten_into(&join(path, "uuid"), out);
        self.name.flatten_into(&join(path, "name"), out);
        self.memory.flatten_into(&join(path, "memory"), out);
    }
}

impl Flatten for Inventory {
    fn flatten_into(&self, path: &str, out: &mut BTreeMap<String, String>) {
        self.devices().flatten_into(&join(path, "device"), out);
        self.memory_sum().flatten_into(&join(path, "sum.memory"), out);
    }
}
