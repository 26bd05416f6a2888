use log::debug;

use super::{Device, ElementBuffer, Tensor};
use crate::errors::TensorError;

/// 张量后端：负责由数值缓冲区构造张量，以及把张量拷贝到指定设备。
///
/// 数据加载模块只依赖这一接口，可替换为真正带加速器的实现。
pub trait TensorBackend: Send + Sync {
    fn name(&self) -> &str;

    /// 后端能否在`device`上放置张量
    fn supports(&self, device: Device) -> bool;

    /// 由扁平缓冲区构造形状为`shape`、位于`device`上的张量
    fn tensor(
        &self,
        buffer: ElementBuffer,
        shape: &[usize],
        device: Device,
    ) -> Result<Tensor, TensorError>;

    /// 将张量拷贝到`device`上，返回新的张量句柄
    fn to_device(&self, tensor: &Tensor, device: Device) -> Result<Tensor, TensorError>;
}

/// 基于`ndarray`的默认后端。
///
/// 所有数据都保存在主机内存中；`accelerators`个加速设备槽位只记录放置目标，
/// 以便上层按设备校验张量的一致性。
#[derive(Debug, Clone)]
pub struct NdarrayBackend {
    accelerators: u32,
}

impl NdarrayBackend {
    /// 支持`CPU:0`和`GPU:0`
    pub fn new() -> Self {
        Self { accelerators: 1 }
    }

    /// 仅支持`CPU:0`
    pub fn cpu_only() -> Self {
        Self { accelerators: 0 }
    }

    pub fn with_accelerators(accelerators: u32) -> Self {
        Self { accelerators }
    }

    fn check(&self, device: Device) -> Result<(), TensorError> {
        if self.supports(device) {
            Ok(())
        } else {
            Err(TensorError::UnsupportedDevice(device.to_string()))
        }
    }
}

impl Default for NdarrayBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TensorBackend for NdarrayBackend {
    fn name(&self) -> &str {
        "ndarray"
    }

    fn supports(&self, device: Device) -> bool {
        match device {
            Device::Cpu(i) => i == 0,
            Device::Accelerator(i) => i < self.accelerators,
        }
    }

    fn tensor(
        &self,
        buffer: ElementBuffer,
        shape: &[usize],
        device: Device,
    ) -> Result<Tensor, TensorError> {
        self.check(device)?;
        Tensor::new(buffer, shape, device)
    }

    fn to_device(&self, tensor: &Tensor, device: Device) -> Result<Tensor, TensorError> {
        self.check(device)?;
        debug!("拷贝张量{:?}: {} -> {}", tensor.shape(), tensor.device(), device);
        Ok(tensor.clone().placed_on(device))
    }
}
