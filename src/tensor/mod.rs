/*
 * @Description  : 张量句柄：数据加载模块所依赖的外部张量能力
 *
 * 数据加载模块只通过本模块提供的构造、重塑、切片和设备拷贝来操作数值数据，
 * 交给张量之后不再直接修改底层缓冲区。
 */

use ndarray::{Array, ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

mod backend;
mod device;
mod property;
mod shape;
mod slice;

pub use backend::{NdarrayBackend, TensorBackend};
pub use device::Device;

#[cfg(test)]
mod tests;

/// 张量元素的数值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    #[serde(rename = "float32")]
    F32,
    #[serde(rename = "int32")]
    I32,
}

/// 交给张量后端的扁平数值缓冲区，自带数值类型
#[derive(Debug, Clone, PartialEq)]
pub enum ElementBuffer {
    F32(Vec<f32>),
    I32(Vec<i32>),
}

impl ElementBuffer {
    pub fn dtype(&self) -> DType {
        match self {
            Self::F32(_) => DType::F32,
            Self::I32(_) => DType::I32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::F32(v) => v.len(),
            Self::I32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TensorData {
    F32(ArrayD<f32>),
    I32(ArrayD<i32>),
}

/// 不透明的张量句柄：带形状、数值类型和所在设备。
/// 注：只要通过`Tensor`初始化的都是张量（即使标量也是张量）。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: TensorData,
    device: Device,
}

impl Tensor {
    /// 由扁平缓冲区和形状创建一个位于`device`上的张量。
    /// `buffer`的长度必须和`shape`中所有元素的乘积相等（形状为`[]`时长度须为1）。
    pub fn new(buffer: ElementBuffer, shape: &[usize], device: Device) -> Result<Self, TensorError> {
        let expected: usize = shape.iter().product();
        if buffer.len() != expected {
            return Err(TensorError::DataLengthMismatch {
                len: buffer.len(),
                shape: shape.to_vec(),
            });
        }
        let mismatch = |_| TensorError::DataLengthMismatch {
            len: expected,
            shape: shape.to_vec(),
        };
        let data = match buffer {
            ElementBuffer::F32(v) => {
                TensorData::F32(Array::from_shape_vec(IxDyn(shape), v).map_err(mismatch)?)
            }
            ElementBuffer::I32(v) => {
                TensorData::I32(Array::from_shape_vec(IxDyn(shape), v).map_err(mismatch)?)
            }
        };
        Ok(Self { data, device })
    }

    /// 返回同一份数据、但标记为位于`device`上的张量。
    /// 供[`TensorBackend`]实现者在完成实际拷贝后使用。
    pub fn placed_on(mut self, device: Device) -> Self {
        self.device = device;
        self
    }
}
