mod device;
mod shape_tests;

use crate::tensor::{Device, ElementBuffer, Tensor};

/// 构造一个CPU上的`float32`张量，元素为`0..n`
fn arange_f32(shape: &[usize]) -> Tensor {
    let n: usize = shape.iter().product();
    let data = (0..n).map(|x| x as f32).collect();
    Tensor::new(ElementBuffer::F32(data), shape, Device::CPU).unwrap()
}

/// 构造一个CPU上的`int32`张量，元素为`0..n`
fn arange_i32(shape: &[usize]) -> Tensor {
    let n: usize = shape.iter().product();
    let data = (0..n as i32).collect();
    Tensor::new(ElementBuffer::I32(data), shape, Device::CPU).unwrap()
}
