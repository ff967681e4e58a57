use serde::Serialize;

/// 频率分布中保留的像素值数量
pub const DIGEST_LEN: usize = 25;

/// 出现次数最多的若干个非零像素值，按出现次数降序排列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyProfile {
    entries: Vec<(u8, u32)>,
}

impl FrequencyProfile {
    /// 从滤波后的像素中统计出现次数最多的 `k` 个非零像素值
    ///
    /// 出现次数相同时取像素值较小者。非零像素值不足 `k` 种时，结果长度小于 `k`。
    pub fn from_pixels(pixels: &[u8], k: usize) -> Self {
        let mut hist = [0u32; 256];
        for &p in pixels {
            hist[p as usize] += 1;
        }
        // 0 视为背景，不参与统计
        hist[0] = 0;

        let mut entries = Vec::with_capacity(k.min(255));
        for _ in 0..k {
            let Some((value, count)) = find_max(&hist) else {
                break;
            };
            entries.push((value, count));
            hist[value as usize] = 0;
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(u8, u32)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 非零像素值种类不足 [`DIGEST_LEN`]，通常是近乎空白的图片
    pub fn is_degenerate(&self) -> bool {
        self.entries.len() < DIGEST_LEN
    }
}

/// 返回出现次数最多的桶，从左往右扫描，只有严格更大才替换
fn find_max(hist: &[u32; 256]) -> Option<(u8, u32)> {
    let mut best: Option<(u8, u32)> = None;
    for (value, &count) in hist.iter().enumerate() {
        if count == 0 {
            continue;
        }
        if best.is_none_or(|(_, max)| count > max) {
            best = Some((value as u8, count));
        }
    }
    best
}
