#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 生成一张带噪声的“指纹”，同一个种子总是得到同一张图
pub fn noise_image(seed: u64, width: u32, height: u32) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    GrayImage::from_fn(width, height, |x, y| {
        // 横向条纹加随机噪声
        let ridge = if (y + x / 7) % 4 < 2 { 160 } else { 40 };
        Luma([ridge + rng.random_range(0..60u8)])
    })
}

/// 在 `dir` 下为每个受试者生成一张 `subject__M_Left_thumb_finger.bmp`
pub fn write_dataset(dir: &Path, subjects: &[u32]) -> Vec<PathBuf> {
    subjects
        .iter()
        .map(|&subject| {
            let path = dir.join(format!("{subject}__M_Left_thumb_finger.bmp"));
            noise_image(subject as u64, 48, 40).save(&path).unwrap();
            path
        })
        .collect()
}
