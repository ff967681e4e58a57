use image::GrayImage;

/// 边缘滤波核，对水平方向的脊线走向更敏感
pub const RIDGE_KERNEL: [[i32; 5]; 5] = [
    [2, 2, 4, 2, 2],
    [1, 1, 2, 1, 1],
    [0, 0, 0, 0, 0],
    [-1, -1, -2, -1, -1],
    [-2, -2, -4, -2, -2],
];

const HALF: i64 = 2;

/// 对灰度图应用 5x5 边缘滤波，输出尺寸不变
///
/// 核按原样作用（不翻转），第 r 行第 c 列的权重对应源像素 `(x + c - 2, y + r - 2)`。
/// 越界的采样点取最近的边缘像素，结果截断到 [0, 255]。
pub fn edge_filter(src: &GrayImage) -> GrayImage {
    let (w, h) = src.dimensions();
    let mut dst = GrayImage::new(w, h);
    if w == 0 || h == 0 {
        return dst;
    }

    let (max_x, max_y) = (w as i64 - 1, h as i64 - 1);
    let raw = src.as_raw();
    let stride = w as usize;

    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let mut acc = 0i32;
            for (ky, row) in RIDGE_KERNEL.iter().enumerate() {
                let sy = (y + ky as i64 - HALF).clamp(0, max_y) as usize;
                let line = &raw[sy * stride..(sy + 1) * stride];
                for (kx, &k) in row.iter().enumerate() {
                    if k == 0 {
                        continue;
                    }
                    let sx = (x + kx as i64 - HALF).clamp(0, max_x) as usize;
                    acc += k * line[sx] as i32;
                }
            }
            dst.put_pixel(x as u32, y as u32, image::Luma([acc.clamp(0, 255) as u8]));
        }
    }
    dst
}
