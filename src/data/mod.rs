//! 数据加载模块
//!
//! 把 MNIST 的 IDX 二进制文件解码为张量，并提供固定批大小、循环回绕的异步批量迭代。
//!
//! # 主要组件
//!
//! - [`idx`]: IDX 格式解码（大端头部解析、校验、目标数值类型可选）
//! - [`BatchIterator`]: 后台加载、按批循环取数的迭代器
//! - [`MnistLoader`]: 组合配置、字节获取与张量后端的入口
//! - [`Split`] / [`filenames`]: 数据集划分及其文件名
//! - [`Fetch`]: 字节获取能力（本地文件 / 内存）
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use mnist_loader::data::{self, Elements};
//!
//! let mut train = data::load("train", 64, true)?;
//! for _ in 0..steps {
//!     let Elements { images, labels } = train.next_batch().await?;
//!     model.forward(&images)?;
//! }
//! ```

pub mod config;
pub mod datasets;
pub mod download;
pub mod error;
pub mod fetch;
pub mod idx;
pub mod inspect;
mod iterator;
pub mod split;

#[cfg(test)]
mod tests;

// Re-exports
pub use config::{LoaderConfig, ValidationMode};
pub use datasets::{MnistLoader, default_data_dir, load, load_split};
pub use error::DataError;
pub use fetch::{Fetch, FileFetcher, InMemoryFetcher};
pub use inspect::render_image;
pub use iterator::{BatchIterator, Elements, LoadPhase};
pub use split::{Split, filenames};
