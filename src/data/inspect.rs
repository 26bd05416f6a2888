//! 调试用：把单张图像渲染成文本

use super::error::DataError;
use super::idx::IMAGE_SIDE;
use crate::tensor::Tensor;

/// 将形状为 [N, 28, 28] 的图像张量中第`index`张渲染为 28 行文本，
/// 每行为空格分隔的像素值。
pub fn render_image(images: &Tensor, index: usize) -> Result<String, DataError> {
    let shape = images.shape();
    if shape.len() != 3 || shape[1] != IMAGE_SIDE || shape[2] != IMAGE_SIDE {
        return Err(DataError::ShapeMismatch {
            expected: vec![shape.first().copied().unwrap_or(0), IMAGE_SIDE, IMAGE_SIDE],
            got: shape.to_vec(),
        });
    }
    if index >= shape[0] {
        return Err(DataError::IndexOutOfBounds {
            index,
            len: shape[0],
        });
    }

    let pixels = images.narrow(index..index + 1)?.to_f32_vec();
    let mut out = String::with_capacity(pixels.len() * 4);
    for row in pixels.chunks(IMAGE_SIDE) {
        let line = row.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" ");
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}
