//! 隐写核心的错误类型。

use std::path::PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;

/// 隐写核心操作的结果类型。
pub type Result<T> = std::result::Result<T, StegoError>;

#[derive(Error, Debug)]
pub enum StegoError {
    /// 输入的图像或载荷文件不存在。
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// 载荷 (含头部) 超出图像容量，且没有接受缩放。
    #[error("Not enough space in the image: payload needs {required} bits, image offers {available} bits")]
    PayloadTooLarge { required: usize, available: usize },

    /// 按建议尺寸缩放后容量仍然不足。
    #[error("Not enough space even after resizing to {width}x{height}: payload needs {required} bits, image offers {available} bits")]
    StillTooSmall {
        width: u32,
        height: u32,
        required: usize,
        available: usize,
    },

    /// 文件名超出头部所能容纳的长度。
    #[error("File name is {len} bytes long, at most {max} bytes fit into the header")]
    NameTooLong { len: usize, max: usize },

    /// 比特数不是 8 的整数倍，无法组合成字节。
    #[error("Bit count {0} is not a multiple of 8")]
    MalformedBitCount(usize),

    /// 载荷比特不完整：图像提前耗尽，或最后一个字节缺少比特。
    #[error("Hidden payload is truncated: expected {expected} bits, found {found}")]
    TruncatedPayload { expected: usize, found: usize },

    /// 编码器在写完数据流之前用尽了像素。
    #[error("Image is too small for the bit stream: {required} bits required, {available} bits available")]
    ImageTooSmall { required: usize, available: usize },

    /// 整数无法用指定的比特宽度表示。
    #[error("Value {value} does not fit into {width} bits")]
    ValueTooWide { value: u64, width: usize },

    /// 头部中记录了未知的通道模式。
    #[error("Unsupported channel mode: {0}")]
    UnsupportedChannelMode(u8),

    /// 头部字段相互矛盾，图像很可能不含隐写数据。
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// 文本载荷不是合法的 UTF-8。
    #[error("Invalid text data found inside the payload")]
    InvalidText(#[from] FromUtf8Error),

    /// 输出格式会以有损方式重新压缩，从而破坏最低有效位。
    #[error("Output format of {} is not lossless, use PNG, BMP, TIFF, WebP or QOI", .0.display())]
    LossyOutputFormat(PathBuf),
}
