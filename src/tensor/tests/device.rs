use crate::errors::TensorError;
use crate::tensor::Device;

#[test]
fn test_device_display() {
    assert_eq!(Device::CPU.to_string(), "CPU:0");
    assert_eq!(Device::GPU.to_string(), "GPU:0");
    assert_eq!(Device::Accelerator(3).to_string(), "GPU:3");
}

#[test]
fn test_device_parse() {
    assert_eq!("CPU:0".parse::<Device>().unwrap(), Device::CPU);
    assert_eq!("gpu:1".parse::<Device>().unwrap(), Device::Accelerator(1));
    assert_eq!("gpu".parse::<Device>().unwrap(), Device::GPU);
    assert_eq!(
        "TPU:0".parse::<Device>().unwrap_err(),
        TensorError::InvalidDevice("TPU:0".to_string())
    );
    assert!("GPU:x".parse::<Device>().is_err());
}

#[test]
fn test_device_default() {
    assert_eq!(Device::default(), Device::CPU);
}

#[test]
fn test_device_serde() {
    let json = serde_json::to_string(&Device::GPU).unwrap();
    assert_eq!(json, "\"GPU:0\"");
    let device: Device = serde_json::from_str("\"CPU:0\"").unwrap();
    assert_eq!(device, Device::CPU);
    assert!(serde_json::from_str::<Device>("\"NPU\"").is_err());
}
