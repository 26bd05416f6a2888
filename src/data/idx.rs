//! IDX 二进制格式解码
//!
//! IDX 格式（所有整数均为大端序）：
//! - [0-3] magic number（0x00000801 = 2049 为标签，0x00000803 = 2051 为图像）
//! - [4-7] 样本数
//! - 仅图像文件：[8-11] 行数，[12-15] 列数
//! - 其后为无符号 8 位数据（像素值或 0-9 的类别标签）
//!
//! 解码是纯函数：只读取传入的字节缓冲区，不做任何网络或文件访问。
//! 目标数值类型由泛型参数 [`Element`] 决定，严格/宽松两种校验由 [`Validation`] 决定。

use log::debug;

use super::error::DataError;
use crate::tensor::{DType, Device, ElementBuffer, Tensor, TensorBackend};

/// 标签文件的 magic number
pub const LABELS_MAGIC: u32 = 2049;
/// 图像文件的 magic number
pub const IMAGES_MAGIC: u32 = 2051;
/// 图像的固定边长（行数与列数）
pub const IMAGE_SIDE: usize = 28;
/// 类别数（标签取值为 0..NUM_CLASSES）
pub const NUM_CLASSES: u8 = 10;

/// IDX 文件的内容种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdxKind {
    Images,
    Labels,
}

impl IdxKind {
    pub fn magic(self) -> u32 {
        match self {
            IdxKind::Images => IMAGES_MAGIC,
            IdxKind::Labels => LABELS_MAGIC,
        }
    }

    pub fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            IMAGES_MAGIC => Some(IdxKind::Images),
            LABELS_MAGIC => Some(IdxKind::Labels),
            _ => None,
        }
    }

    /// 头部字节数
    pub fn header_len(self) -> usize {
        match self {
            IdxKind::Images => 16,
            IdxKind::Labels => 8,
        }
    }
}

/// 头部校验的严格程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// 固定内容种类与样本数（按数据集划分的文档值），并要求标签位于 0..10
    Strict { kind: IdxKind, num_examples: usize },
    /// 由 magic number 推断内容种类，接受任意样本数
    Permissive,
}

/// 解码目标的数值类型：像素/标签字节会被拓宽为该类型
pub trait Element: Copy + From<u8> + Send + 'static {
    const DTYPE: DType;

    fn into_buffer(data: Vec<Self>) -> ElementBuffer;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn into_buffer(data: Vec<Self>) -> ElementBuffer {
        ElementBuffer::F32(data)
    }
}

impl Element for i32 {
    const DTYPE: DType = DType::I32;

    fn into_buffer(data: Vec<Self>) -> ElementBuffer {
        ElementBuffer::I32(data)
    }
}

/// 解码结果：带内容种类、样本数与扁平数据的数组
#[derive(Debug, Clone, PartialEq)]
pub struct IdxArray<T> {
    kind: IdxKind,
    num_examples: usize,
    data: Vec<T>,
}

impl<T: Element> IdxArray<T> {
    pub fn kind(&self) -> IdxKind {
        self.kind
    }

    pub fn num_examples(&self) -> usize {
        self.num_examples
    }

    /// 图像为 [N, 28, 28]，标签为 [N]
    pub fn shape(&self) -> Vec<usize> {
        match self.kind {
            IdxKind::Images => vec![self.num_examples, IMAGE_SIDE, IMAGE_SIDE],
            IdxKind::Labels => vec![self.num_examples],
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// 交给张量后端：先构造扁平张量，再重塑为[`Self::shape`]，最后拷贝到`device`
    pub fn into_tensor(
        self,
        backend: &dyn TensorBackend,
        device: Device,
    ) -> Result<Tensor, DataError> {
        let shape = self.shape();
        let len = self.data.len();
        let flat = backend.tensor(T::into_buffer(self.data), &[len], device)?;
        let tensor = flat.reshape(&shape)?;
        Ok(backend.to_device(&tensor, device)?)
    }
}

/// 把按本机字节序读出的 32 位整数解释为文件中的大端整数。
/// 在小端机器上即交换字节顺序，在大端机器上保持不变。
pub fn big_endian_to_native(raw: u32) -> u32 {
    u32::from_be(raw)
}

/// 从`offset`处读取一个大端 32 位无符号整数
pub fn read_be_u32(bytes: &[u8], offset: usize) -> Result<u32, DataError> {
    let word: [u8; 4] = offset
        .checked_add(4)
        .and_then(|end| bytes.get(offset..end))
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| {
            DataError::FormatError(format!(
                "读取头部失败: 偏移 {offset} 处不足 4 字节（总长 {}）",
                bytes.len()
            ))
        })?;
    Ok(big_endian_to_native(u32::from_ne_bytes(word)))
}

/// 按 IDX 格式写出一个文件的完整字节：大端头部后接`payload`。
/// 图像文件的行、列固定为 28，`payload`长度不做检查。
pub fn encode(kind: IdxKind, num_examples: u32, payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(kind.header_len() + payload.len());
    bytes.extend_from_slice(&kind.magic().to_be_bytes());
    bytes.extend_from_slice(&num_examples.to_be_bytes());
    if kind == IdxKind::Images {
        let side = IMAGE_SIDE as u32;
        bytes.extend_from_slice(&side.to_be_bytes());
        bytes.extend_from_slice(&side.to_be_bytes());
    }
    bytes.extend_from_slice(payload);
    bytes
}

/// 按`validation`解析一个 IDX 字节缓冲区
pub fn decode<T: Element>(bytes: &[u8], validation: Validation) -> Result<IdxArray<T>, DataError> {
    let magic = read_be_u32(bytes, 0)?;
    let kind = IdxKind::from_magic(magic).ok_or_else(|| {
        DataError::FormatError(format!(
            "无效的 magic number: {magic} (期望 {LABELS_MAGIC} 或 {IMAGES_MAGIC})"
        ))
    })?;
    if let Validation::Strict { kind: expected, .. } = validation {
        if kind != expected {
            return Err(DataError::FormatError(format!(
                "无效的 magic number: {magic} (期望 {})",
                expected.magic()
            )));
        }
    }

    let num_examples = read_be_u32(bytes, 4)? as usize;
    if let Validation::Strict {
        num_examples: expected,
        ..
    } = validation
    {
        if num_examples != expected {
            return Err(DataError::FormatError(format!(
                "无效的样本数: {num_examples} (期望 {expected})"
            )));
        }
    }

    let per_example = match kind {
        IdxKind::Images => {
            let rows = read_be_u32(bytes, 8)? as usize;
            let cols = read_be_u32(bytes, 12)? as usize;
            if rows != IMAGE_SIDE || cols != IMAGE_SIDE {
                return Err(DataError::FormatError(format!(
                    "无效的图像尺寸: {rows}x{cols} (期望 {IMAGE_SIDE}x{IMAGE_SIDE})"
                )));
            }
            rows * cols
        }
        IdxKind::Labels => 1,
    };

    let payload = &bytes[kind.header_len()..];
    let expected_len = num_examples.checked_mul(per_example).ok_or_else(|| {
        DataError::FormatError(format!("样本数 {num_examples} 过大，数据长度溢出"))
    })?;
    if payload.len() != expected_len {
        return Err(DataError::FormatError(format!(
            "数据长度不匹配: {} 字节 (期望 {expected_len})",
            payload.len()
        )));
    }

    if kind == IdxKind::Labels && matches!(validation, Validation::Strict { .. }) {
        if let Some((index, label)) = payload.iter().enumerate().find(|(_, l)| **l >= NUM_CLASSES) {
            return Err(DataError::FormatError(format!(
                "第 {index} 个标签越界: {label} (期望 0..{NUM_CLASSES})"
            )));
        }
    }

    debug!(
        "IDX 解码: {kind:?}, {num_examples} 个样本, 目标类型 {:?}",
        T::DTYPE
    );
    let data = payload.iter().map(|&b| T::from(b)).collect();
    Ok(IdxArray {
        kind,
        num_examples,
        data,
    })
}

/// [`decode_tensor`]的结果
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTensor {
    pub tensor: Tensor,
    pub kind: IdxKind,
    pub num_examples: usize,
}

/// 解码并交给张量后端。`dtype`只决定目标数值类型，解析逻辑完全相同。
pub fn decode_tensor(
    bytes: &[u8],
    validation: Validation,
    dtype: DType,
    backend: &dyn TensorBackend,
    device: Device,
) -> Result<DecodedTensor, DataError> {
    fn build<T: Element>(
        bytes: &[u8],
        validation: Validation,
        backend: &dyn TensorBackend,
        device: Device,
    ) -> Result<DecodedTensor, DataError> {
        let array = decode::<T>(bytes, validation)?;
        let (kind, num_examples) = (array.kind(), array.num_examples());
        Ok(DecodedTensor {
            tensor: array.into_tensor(backend, device)?,
            kind,
            num_examples,
        })
    }

    match dtype {
        DType::F32 => build::<f32>(bytes, validation, backend, device),
        DType::I32 => build::<i32>(bytes, validation, backend, device),
    }
}
