use anyhow::{Result, ensure};

/// 内存中的图片，行优先存储的 H×W 三通道 8 位像素网格
///
/// 通道含义由位置决定：输入时为 BGR，经过 [`Image::to_hsv`] 之后为 HSV。
/// 解码工作由上游负责，这里只接受已经解码好的像素数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    data: Vec<[u8; 3]>,
}

impl Image {
    /// 从行优先的像素数据创建图片
    ///
    /// 图片不能为空，像素数量必须等于 width × height
    pub fn from_pixels(width: usize, height: usize, data: Vec<[u8; 3]>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "image must not be empty: {}x{}", width, height);
        ensure!(
            data.len() == width * height,
            "pixel count mismatch: expected {}, got {}",
            width * height,
            data.len()
        );
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 返回 (x, y) 处的像素
    #[inline(always)]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.data[y * self.width + x]
    }

    /// 将 BGR 图片逐像素转换为 HSV
    ///
    /// 数值约定与 OpenCV 的 8 位 BGR2HSV 一致：
    /// H ∈ [0, 180)，色相折半以存入一个字节；S、V ∈ [0, 256)
    pub fn to_hsv(&self) -> Image {
        let data = self.data.iter().map(|&p| bgr_to_hsv(p)).collect();
        Image { width: self.width, height: self.height, data }
    }
}

/// 单个像素的 BGR → HSV 转换
fn bgr_to_hsv([b, g, r]: [u8; 3]) -> [u8; 3] {
    let (b, g, r) = (b as f32, g as f32, r as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };
    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    // 色相折半后四舍五入，接近 360 度的色相会进位到 180，需要回绕到 0
    let h = (h / 2.0).round() as u16 % 180;
    [h as u8, s.round() as u8, v.round() as u8]
}

/// 矩形区域掩码，标记参与直方图统计的像素
///
/// 矩形边界为半开区间：起点包含，终点不包含
#[derive(Debug, Clone)]
pub struct RegionMask {
    width: usize,
    mask: Vec<bool>,
}

impl RegionMask {
    /// 在 width×height 的网格上构建 [x0, x1) × [y0, y1) 的矩形掩码
    pub fn rect(width: usize, height: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        let mut mask = vec![false; width * height];
        for y in y0..y1.min(height) {
            for x in x0..x1.min(width) {
                mask[y * width + x] = true;
            }
        }
        Self { width, mask }
    }

    /// (x, y) 处的像素是否在掩码内
    #[inline(always)]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.mask[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_pure_colors() {
        // OpenCV 8 位 BGR2HSV 的标准值
        assert_eq!(bgr_to_hsv([255, 0, 0]), [120, 255, 255]); // 蓝
        assert_eq!(bgr_to_hsv([0, 255, 0]), [60, 255, 255]); // 绿
        assert_eq!(bgr_to_hsv([0, 0, 255]), [0, 255, 255]); // 红
    }

    #[test]
    fn test_hsv_achromatic() {
        // 灰度像素没有色相和饱和度
        assert_eq!(bgr_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(bgr_to_hsv([128, 128, 128]), [0, 0, 128]);
        assert_eq!(bgr_to_hsv([255, 255, 255]), [0, 0, 255]);
    }

    #[test]
    fn test_hsv_hue_range() {
        // 任意像素的色相都必须落在 [0, 180) 内
        for b in (0..=255).step_by(17) {
            for g in (0..=255).step_by(17) {
                for r in (0..=255).step_by(17) {
                    let [h, _, _] = bgr_to_hsv([b as u8, g as u8, r as u8]);
                    assert!(h < 180, "hue {} out of range for bgr ({}, {}, {})", h, b, g, r);
                }
            }
        }
    }

    #[test]
    fn test_image_validation() {
        assert!(Image::from_pixels(0, 4, vec![]).is_err());
        assert!(Image::from_pixels(2, 2, vec![[0; 3]; 3]).is_err());
        assert!(Image::from_pixels(2, 2, vec![[0; 3]; 4]).is_ok());
    }

    #[test]
    fn test_rect_mask_bounds() {
        let mask = RegionMask::rect(4, 3, 1, 1, 3, 3);
        assert!(!mask.contains(0, 0));
        assert!(mask.contains(1, 1));
        assert!(mask.contains(2, 2));
        assert!(!mask.contains(3, 2));
    }
}
