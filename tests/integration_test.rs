use gpu_node_tagger::error::{Result, TaggerError};
use gpu_node_tagger::gpu::{collect_from, flatten, DeviceSource, GpuInfo, Memory, MIB};
use gpu_node_tagger::k8s::{build_patch, ANNOTATIONS_PATH};

struct ByteCountingDevices(Vec<(&'static str, u64, u64, u64)>);

impl DeviceSource for ByteCountingDevices {
    fn device_count(&self) -> Result<u32> {
        Ok(self.0.len() as u32)
    }

    fn device_info(&self, index: u32) -> Result<GpuInfo> {
        let (uuid, total, used, free) = self.0[index as usize];
        Ok(GpuInfo {
            uuid: uuid.to_string(),
            name: "NVIDIA H100 80GB HBM3".to_string(),
            memory: Memory::from_bytes(total, used, free),
        })
    }
}

#[test]
fn test_error_types() {
    let err = TaggerError::PodNotScheduled {
        name: "tagger-pod".to_string(),
        namespace: "default".to_string(),
    };

    assert!(err.to_string().contains("tagger-pod"));
    assert!(err.to_string().contains("default"));

    let err = TaggerError::DeviceError("NVML Shared Library Not Found".to_string());
    assert!(err.to_string().contains("NVML Shared Library Not Found"));
}

#[test]
fn test_version_const() {
    assert!(!gpu_node_tagger::VERSION.is_empty());
}

#[test]
fn test_inventory_to_patch() {
    let source = ByteCountingDevices(vec![
        ("GPU-0", 10240 * MIB, 2048 * MIB, 8192 * MIB),
        ("GPU-1", 8192 * MIB + 12345, 0, 8192 * MIB + 12345),
    ]);

    let inventory = collect_from(&source).expect("collection should succeed");
    assert_eq!(inventory.memory_sum(), Memory::new(18432, 2048, 16384));

    let annotations = flatten("prefix", &inventory);
    assert_eq!(annotations["prefix/device.0.memory.total"], "10240");
    assert_eq!(annotations["prefix/device.1.memory.total"], "8192");
    assert_eq!(annotations["prefix/sum.memory.used"], "2048");
    assert_eq!(annotations.len(), 13);

    let patch = build_patch("prefix", &inventory)
        .to_json()
        .expect("serialize patch");
    assert_eq!(patch[0]["path"], ANNOTATIONS_PATH);
    assert_eq!(patch[0]["value"]["prefix/device.1.uuid"], "GPU-1");
}
