//! 隐写核心对图像的最小依赖：尺寸以及按坐标读写 RGB 三元组。

use image::{ImageBuffer, Rgb, RgbImage};

pub trait Carrier {
    /// 返回 `(width, height)`，在一次编码或解码过程中保持不变。
    fn dimensions(&self) -> (u32, u32);

    fn rgb(&self, x: u32, y: u32) -> [u8; 3];
}

pub trait CarrierMut: Carrier {
    fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]);
}

impl Carrier for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.get_pixel(x, y).0
    }
}

impl CarrierMut for RgbImage {
    fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self.put_pixel(x, y, Rgb(rgb));
    }
}

/// 像素扫描顺序：外层按列 (x)，内层按行 (y)。
pub(crate) fn scan_order(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_walks_columns_first() {
        let order: Vec<_> = scan_order(2, 3).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(scan_order(0, 5).count(), 0);
    }

    #[test]
    fn rgb_image_exposes_pixels() {
        let mut img = RgbImage::new(3, 2);
        img.set_rgb(2, 1, [1, 2, 3]);
        assert_eq!(Carrier::dimensions(&img), (3, 2));
        assert_eq!(img.rgb(2, 1), [1, 2, 3]);
        assert_eq!(img.rgb(0, 0), [0, 0, 0]);
    }
}
