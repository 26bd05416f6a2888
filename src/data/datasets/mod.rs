//! 内置数据集
//!
//! - MNIST：手写数字分类（训练集 60000，测试集 10000）

mod mnist;

pub use mnist::{MNIST_FILES, MnistLoader, default_data_dir, load, load_split};
