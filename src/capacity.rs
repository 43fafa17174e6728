//! # 容量规划模块
//!
//! 容量以“可写入的数据流比特数”计量，数据流包含头部。
//! 头部区域总是按每像素三通道的满密度计算，头部之后按通道模式的密度计算，
//! 因此所需比特数无需再按模式加倍。

use crate::constants::{CHANNELS_PER_PIXEL, HEADER_BITS, RESIZE_SLACK_CHANNELS};
use crate::header::ChannelMode;

/// 尺寸为 `width` x `height` 的图像在给定模式下最多能承载的数据流比特数。
pub fn max_bits(width: u32, height: u32, mode: ChannelMode) -> usize {
    let pixels = width as usize * height as usize;
    let channels = pixels * CHANNELS_PER_PIXEL;
    if channels <= HEADER_BITS {
        return channels;
    }

    // 头部最后一个像素可能只用掉了部分通道，剩余通道按该像素是否被选中计入
    let boundary = HEADER_BITS / CHANNELS_PER_PIXEL;
    let first_free = HEADER_BITS.div_ceil(CHANNELS_PER_PIXEL);
    let mut payload = 0;
    if first_free > boundary && mode.selects(boundary) {
        payload += first_free * CHANNELS_PER_PIXEL - HEADER_BITS;
    }
    payload += mode.selected_between(first_free, pixels) * CHANNELS_PER_PIXEL;

    HEADER_BITS + payload
}

/// 载荷加上头部后的数据流比特数。
pub fn required_bits(payload_bits: usize) -> usize {
    HEADER_BITS + payload_bits
}

pub fn fits(required: usize, available: usize) -> bool {
    required <= available
}

/// 等比缩放系数，使图像的通道总数足以容纳 `required` 比特。
///
/// 结果只是建议值，缩放后仍需重新检查容量。
pub fn resize_ratio(width: u32, height: u32, mode: ChannelMode, required: usize) -> f64 {
    let channels = width as usize * height as usize * CHANNELS_PER_PIXEL;
    if channels == 0 {
        return f64::INFINITY;
    }

    let payload = required.saturating_sub(HEADER_BITS);
    let needed_channels = match mode {
        ChannelMode::AllPixels => HEADER_BITS + payload,
        ChannelMode::EveryOtherPixel => HEADER_BITS + 2 * payload,
    } + RESIZE_SLACK_CHANNELS;

    (needed_channels as f64 / channels as f64).sqrt().max(1.0)
}

/// 建议的缩放后尺寸，宽高都向上取整。图像为空时无法缩放，返回 `None`。
pub fn suggest_dimensions(
    width: u32,
    height: u32,
    mode: ChannelMode,
    required: usize,
) -> Option<(u32, u32)> {
    let ratio = resize_ratio(width, height, mode, required);
    if !ratio.is_finite() {
        return None;
    }

    let scale = |side: u32| -> Option<u32> {
        let scaled = (f64::from(side) * ratio).ceil();
        (scaled <= f64::from(u32::MAX)).then_some(scaled as u32)
    };
    Some((scale(width)?, scale(height)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_pixels_uses_every_channel() {
        assert_eq!(max_bits(20, 10, ChannelMode::AllPixels), 600);
        assert_eq!(max_bits(4, 4, ChannelMode::AllPixels), 48);
        assert_eq!(max_bits(0, 10, ChannelMode::AllPixels), 0);
    }

    #[test]
    fn sparse_mode_keeps_header_dense() {
        // 209 个像素：头部占满前 193 个像素和第 194 个像素的 R 通道，
        // 之后偶数序号像素 194..=208 共 8 个，提供 24 比特
        assert_eq!(max_bits(11, 19, ChannelMode::EveryOtherPixel), 604);
        assert_eq!(max_bits(1, 208, ChannelMode::EveryOtherPixel), 601);
        assert_eq!(max_bits(4, 4, ChannelMode::EveryOtherPixel), 48);
    }

    #[test]
    fn sparse_capacity_never_exceeds_dense() {
        for side in [15, 16, 33, 64, 101] {
            assert!(
                max_bits(side, side, ChannelMode::EveryOtherPixel)
                    <= max_bits(side, side, ChannelMode::AllPixels)
            );
        }
    }

    #[test]
    fn exact_fit_is_accepted() {
        assert!(fits(required_bits(16), max_bits(20, 10, ChannelMode::AllPixels)));
        assert!(fits(604, 604));
        assert!(!fits(605, 604));
    }

    #[test]
    fn doubling_payload_stops_fitting_in_sparse_mode() {
        let (width, height) = (40, 40);
        let dense = max_bits(width, height, ChannelMode::AllPixels);
        let payload = dense - HEADER_BITS;

        assert!(fits(required_bits(payload), dense));
        assert!(!fits(
            required_bits(payload),
            max_bits(width, height, ChannelMode::EveryOtherPixel)
        ));
        assert!(!fits(required_bits(payload * 2), dense));
    }

    #[test]
    fn suggested_dimensions_fit_the_payload() {
        for mode in [ChannelMode::AllPixels, ChannelMode::EveryOtherPixel] {
            for (width, height, payload) in [(10, 10, 800), (30, 7, 10_000), (100, 100, 90_000)] {
                let required = required_bits(payload);
                let (w, h) = suggest_dimensions(width, height, mode, required).unwrap();
                assert!(w >= width && h >= height);
                assert!(
                    fits(required, max_bits(w, h, mode)),
                    "{mode}: {width}x{height} -> {w}x{h} too small for {required}"
                );
            }
        }
    }

    #[test]
    fn empty_image_cannot_be_resized() {
        assert_eq!(suggest_dimensions(0, 0, ChannelMode::AllPixels, 1000), None);
    }
}
