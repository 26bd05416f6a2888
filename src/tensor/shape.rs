use ndarray::{ArrayD, IxDyn};

use super::{Tensor, TensorData};
use crate::errors::TensorError;

impl Tensor {
    /// 返回一个按`shape`重新排布的新张量，元素个数必须保持不变
    pub fn reshape(&self, shape: &[usize]) -> Result<Self, TensorError> {
        let incompatible = || TensorError::IncompatibleShape {
            from: self.shape().to_vec(),
            to: shape.to_vec(),
        };
        if self.size() != shape.iter().product::<usize>() {
            return Err(incompatible());
        }
        let data = match &self.data {
            TensorData::F32(a) => TensorData::F32(reshape_array(a, shape).ok_or_else(incompatible)?),
            TensorData::I32(a) => TensorData::I32(reshape_array(a, shape).ok_or_else(incompatible)?),
        };
        Ok(Self {
            data,
            device: self.device,
        })
    }
}

fn reshape_array<A: Clone>(array: &ArrayD<A>, shape: &[usize]) -> Option<ArrayD<A>> {
    // 先转为标准（行优先）布局，保证元素顺序与扁平缓冲区一致
    array
        .as_standard_layout()
        .into_owned()
        .into_shape(IxDyn(shape))
        .ok()
}
