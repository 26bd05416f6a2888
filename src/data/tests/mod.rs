mod mnist;

use crate::data::fetch::InMemoryFetcher;
use crate::data::idx::{IMAGE_SIDE, IdxKind, encode};
use crate::data::split::Split;

/// `n`张图像，第`i`张的全部像素都等于`i % 256`
fn images_bytes(n: usize) -> Vec<u8> {
    let pixels: Vec<u8> = (0..n)
        .flat_map(|i| std::iter::repeat((i % 256) as u8).take(IMAGE_SIDE * IMAGE_SIDE))
        .collect();
    encode(IdxKind::Images, n as u32, &pixels)
}

/// `n`个标签，第`i`个为`i % 10`
fn labels_bytes(n: usize) -> Vec<u8> {
    let labels: Vec<u8> = (0..n).map(|i| (i % 10) as u8).collect();
    encode(IdxKind::Labels, n as u32, &labels)
}

/// 为`split`准备含`n`个样本的内存文件
fn fetcher_for(split: Split, n: usize) -> InMemoryFetcher {
    let (labels, images) = split.filenames();
    InMemoryFetcher::new()
        .with_file(images, images_bytes(n))
        .with_file(labels, labels_bytes(n))
}
