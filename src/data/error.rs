//! 数据加载错误类型定义

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::errors::TensorError;
use crate::tensor::Device;

/// 数据加载相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 配置错误（未知的数据集划分、非法的批大小等），在任何异步工作开始前同步返回
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 格式错误（如 magic number、尺寸或样本数不匹配）
    #[error("格式错误: {0}")]
    FormatError(String),

    /// 张量未位于配置的设备上：说明加载流水线本身有缺陷，不可恢复
    #[error("设备放置错误: 期望 {expected}, 图像位于 {images}, 标签位于 {labels}")]
    DevicePlacementError {
        expected: Device,
        images: Device,
        labels: Device,
    },

    /// 文件未找到
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 下载错误
    #[error("下载错误: {0}")]
    DownloadError(String),

    /// 校验和不匹配
    #[error("校验和不匹配: 期望 {expected}, 实际 {got}")]
    ChecksumMismatch { expected: String, got: String },

    /// 解压错误
    #[error("解压错误: {0}")]
    DecompressionError(String),

    /// 形状不匹配
    #[error("形状不匹配: 期望 {expected:?}, 实际 {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// 索引越界
    #[error("索引越界: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// 张量后端错误
    #[error("张量错误: {0}")]
    Tensor(#[from] TensorError),

    /// 迭代器的后台加载已失败；之后的每次请求都报告同一个根因
    #[error("数据加载失败: {0}")]
    LoadFailed(#[source] Arc<DataError>),

    /// 需要在异步运行时（tokio）内部创建加载器
    #[error("当前线程没有可用的异步运行时")]
    RuntimeUnavailable,

    /// 后台任务 panic 或被中止
    #[error("后台任务失败: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for DataError {
    fn from(err: tokio::task::JoinError) -> Self {
        DataError::TaskFailed(err.to_string())
    }
}
