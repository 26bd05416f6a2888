/*
 * @Description  : 本文件仅包含一些属性方法，不包含任何运算方法，所以不会需要用到mut
 */

use ndarray::ArrayViewD;

use super::{DType, Device, Tensor, TensorData};

impl Tensor {
    /// 若为向量，`shape`可以是[n]；若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]。
    pub fn shape(&self) -> &[usize] {
        match &self.data {
            TensorData::F32(a) => a.shape(),
            TensorData::I32(a) => a.shape(),
        }
    }

    /// 张量的维（dim）数、阶（rank）数，即`shape()`的元素个数
    pub fn dimension(&self) -> usize {
        self.shape().len()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn dtype(&self) -> DType {
        match &self.data {
            TensorData::F32(_) => DType::F32,
            TensorData::I32(_) => DType::I32,
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// 若为`float32`张量，返回其只读视图
    pub fn as_f32(&self) -> Option<ArrayViewD<'_, f32>> {
        match &self.data {
            TensorData::F32(a) => Some(a.view()),
            TensorData::I32(_) => None,
        }
    }

    /// 若为`int32`张量，返回其只读视图
    pub fn as_i32(&self) -> Option<ArrayViewD<'_, i32>> {
        match &self.data {
            TensorData::I32(a) => Some(a.view()),
            TensorData::F32(_) => None,
        }
    }

    /// 按行优先顺序取出全部元素（整型会被转为`f32`）
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match &self.data {
            TensorData::F32(a) => a.iter().copied().collect(),
            TensorData::I32(a) => a.iter().map(|&x| x as f32).collect(),
        }
    }
}
