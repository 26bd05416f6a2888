//! 数据集划分（训练集 / 测试集）及其文件名、样本数

use std::fmt::{self, Display};
use std::str::FromStr;

use super::error::DataError;
use super::idx::{IdxKind, Validation};

/// MNIST 的两个标准划分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// 文档规定的样本数
    pub fn num_examples(self) -> usize {
        match self {
            Split::Train => 60000,
            Split::Test => 10000,
        }
    }

    /// (标签文件, 图像文件) 的相对路径
    pub fn filenames(self) -> (&'static str, &'static str) {
        match self {
            Split::Train => ("train-labels-idx1-ubyte", "train-images-idx3-ubyte"),
            Split::Test => ("t10k-labels-idx1-ubyte", "t10k-images-idx3-ubyte"),
        }
    }

    /// 该划分下某类文件的严格校验规则
    pub fn strict(self, kind: IdxKind) -> Validation {
        Validation::Strict {
            kind,
            num_examples: self.num_examples(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

impl FromStr for Split {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "test" => Ok(Split::Test),
            _ => Err(DataError::ConfigError(format!("Bad split: {s}"))),
        }
    }
}

impl Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 按划分名返回 (标签文件, 图像文件)；未知名称立即返回`ConfigError`
pub fn filenames(split: &str) -> Result<(&'static str, &'static str), DataError> {
    Ok(split.parse::<Split>()?.filenames())
}
