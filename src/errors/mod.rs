use thiserror::Error;

/// 张量能力（构造、重塑、切片、设备放置）相关的错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{len}与形状{shape:?}所需的元素个数不一致")]
    DataLengthMismatch { len: usize, shape: Vec<usize> },

    #[error("形状不兼容，无法将形状{from:?}重塑为{to:?}")]
    IncompatibleShape { from: Vec<usize>, to: Vec<usize> },

    // 切片（沿首维）
    #[error("切片范围{start}..{end}超出首维长度{len}")]
    SliceOutOfRange { start: usize, end: usize, len: usize },
    #[error("无法接受零数据范围的切片：{start}..{end}")]
    EmptySlice { start: usize, end: usize },
    #[error("标量张量（阶数为0）无法沿首维切片")]
    ScalarSlice,

    // 设备
    #[error("当前张量后端不支持设备{0}")]
    UnsupportedDevice(String),
    #[error("无法解析的设备名称：{0}")]
    InvalidDevice(String),
}
