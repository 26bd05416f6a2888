//! # MNIST Loader
//!
//! 把 MNIST（IDX 二进制格式）数据集加载为内存中的张量，并提供固定批大小、
//! 循环回绕的异步批量迭代器，供训练循环使用。
//!
//! - [`data::idx`]: IDX 格式解码（纯函数，不做 I/O）
//! - [`data::BatchIterator`]: 后台并发加载图像与标签、按批循环取数
//! - [`tensor`]: 数据加载所依赖的张量能力（构造、重塑、切片、设备拷贝）
//!
//! ```ignore
//! let mut train = mnist_loader::data::load("train", 64, true)?;
//! let batch = train.next_batch().await?;
//! assert_eq!(batch.images.shape(), &[64, 28, 28]);
//! ```

pub mod data;
pub mod errors;
pub mod tensor;

pub use data::{BatchIterator, DataError, Elements, MnistLoader};
pub use errors::TensorError;
pub use tensor::{DType, Device, Tensor};
