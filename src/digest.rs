use std::path::Path;

use image::GrayImage;
use log::warn;
use serde::Serialize;

use crate::error::Result;
use crate::filter::edge_filter;
use crate::profile::{DIGEST_LEN, FrequencyProfile};
use crate::utils;

/// 将频率分布折叠为一个浮点数
///
/// 初始值为 1，依次乘以 `3 + value / count`。只有出现过的像素值才会进入分布，
/// 所以 count 不会为 0。空分布的摘要为 1。
pub fn encode(profile: &FrequencyProfile) -> f64 {
    profile
        .entries()
        .iter()
        .fold(1.0, |acc, &(value, count)| acc * (3.0 + value as f64 / count as f64))
}

/// 一张图片的特征提取结果
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub width: u32,
    pub height: u32,
    pub profile: FrequencyProfile,
    pub digest: f64,
}

/// 灰度图 → 边缘滤波 → 频率分布 → 摘要
pub fn extract(image: &GrayImage) -> (GrayImage, Extraction) {
    let filtered = edge_filter(image);
    let profile = FrequencyProfile::from_pixels(filtered.as_raw(), DIGEST_LEN);
    let digest = encode(&profile);
    let extraction =
        Extraction { width: image.width(), height: image.height(), profile, digest };
    (filtered, extraction)
}

/// 读取图片文件并计算摘要
pub fn extract_file(path: impl AsRef<Path>) -> Result<Extraction> {
    let path = path.as_ref();
    let image = utils::imread(path)?;
    let (_, extraction) = extract(&image);
    if extraction.profile.is_degenerate() {
        warn!(
            "{} 只有 {} 种非零像素值，摘要可能不可靠",
            path.display(),
            extraction.profile.len()
        );
    }
    Ok(extraction)
}

pub fn digest_file(path: impl AsRef<Path>) -> Result<f64> {
    extract_file(path).map(|e| e.digest)
}
