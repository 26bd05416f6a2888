use std::ops::Range;

use ndarray::{Axis, Slice};

use super::{Tensor, TensorData};
use crate::errors::TensorError;

impl Tensor {
    /// 沿首维（样本维）截取`range`，其余各维保持完整，返回新的张量（拷贝而非视图）。
    ///
    /// 与`NumPy`的`t[start:end]`一致，结果的首维长度为`range.len()`，不会压缩任何维度。
    ///
    /// # 错误
    /// - 标量张量：`TensorError::ScalarSlice`
    /// - 空范围：`TensorError::EmptySlice`
    /// - 超出首维：`TensorError::SliceOutOfRange`
    pub fn narrow(&self, range: Range<usize>) -> Result<Self, TensorError> {
        let Some(&len) = self.shape().first() else {
            return Err(TensorError::ScalarSlice);
        };
        if range.start >= range.end {
            return Err(TensorError::EmptySlice {
                start: range.start,
                end: range.end,
            });
        }
        if range.end > len {
            return Err(TensorError::SliceOutOfRange {
                start: range.start,
                end: range.end,
                len,
            });
        }

        let slice = Slice::from(range);
        let data = match &self.data {
            TensorData::F32(a) => TensorData::F32(a.slice_axis(Axis(0), slice).to_owned()),
            TensorData::I32(a) => TensorData::I32(a.slice_axis(Axis(0), slice).to_owned()),
        };
        Ok(Self {
            data,
            device: self.device,
        })
    }
}
