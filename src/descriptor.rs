use anyhow::{Result, ensure};

use crate::image::{Image, RegionMask};

/// 空间分区颜色描述符
///
/// 以图片中心为公共角把图片切成四个矩形区域，对每个区域统计 HSV 三维直方图，
/// 分别做 L2 归一化后拼接成固定长度的特征向量。
/// 建立索引和查询必须使用相同的 bins，否则距离比较没有意义
#[derive(Debug, Clone, Copy)]
pub struct ColorDescriptor {
    bins: (usize, usize, usize),
}

impl ColorDescriptor {
    /// 创建描述符，bins 为 (H, S, V) 三个通道的分箱数量
    pub fn new(bins: (usize, usize, usize)) -> Result<Self> {
        ensure!(bins.0 > 0 && bins.1 > 0 && bins.2 > 0, "bin counts must be positive: {:?}", bins);
        Ok(Self { bins })
    }

    /// 特征向量的长度：4 × bins_h × bins_s × bins_v
    pub fn feature_len(&self) -> usize {
        4 * self.bins.0 * self.bins.1 * self.bins.2
    }

    /// 计算图片的特征向量，相同的图片和 bins 的结果是确定的
    pub fn describe(&self, image: &Image) -> Result<Vec<f32>> {
        let image = image.to_hsv();
        let (w, h) = (image.width(), image.height());
        let (cx, cy) = (w / 2, h / 2);

        let mut features = Vec::with_capacity(self.feature_len());
        // 四个区域按左上、右上、左下、右下的顺序拼接
        // 矩形为半开区间，每个像素恰好属于一个区域，宽高为奇数时区域大小不相等
        for (x0, y0, x1, y1) in [(0, 0, cx, cy), (cx, 0, w, cy), (0, cy, cx, h), (cx, cy, w, h)] {
            let mask = RegionMask::rect(w, h, x0, y0, x1, y1);
            features.extend(self.histogram(&image, &mask));
        }
        Ok(features)
    }

    /// 统计掩码区域内的 HSV 三维直方图并做 L2 归一化
    ///
    /// 展平顺序固定为 H 外层、V 内层；区域内没有像素时返回全零向量
    fn histogram(&self, image: &Image, mask: &RegionMask) -> Vec<f32> {
        let (bh, bs, bv) = self.bins;
        let mut hist = vec![0.0f32; bh * bs * bv];

        for y in 0..image.height() {
            for x in 0..image.width() {
                if !mask.contains(x, y) {
                    continue;
                }
                let [h, s, v] = image.pixel(x, y);
                // 各通道按固定取值范围均匀分箱：H ∈ [0, 180)，S、V ∈ [0, 256)
                let hb = h as usize * bh / 180;
                let sb = s as usize * bs / 256;
                let vb = v as usize * bv / 256;
                hist[(hb * bs + sb) * bv + vb] += 1.0;
            }
        }

        let norm = hist.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut hist {
                *x /= norm;
            }
        }
        hist
    }
}
