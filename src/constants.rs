/// 每个像素参与隐写的颜色通道数 (R, G, B)。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 每个字节的比特数。
pub const BITS_PER_BYTE: usize = 8;

/// 载荷类型字段宽度: 0 表示文本，1 表示文件。
pub const FILE_TYPE_BITS: usize = 1;

/// 通道模式字段宽度。
pub const MODE_BITS: usize = 3;

/// 文件名字段宽度，不足部分在前面补零。
pub const NAME_BITS: usize = 512;

/// 起止偏移字段各自的宽度。
pub const OFFSET_BITS: usize = 32;

/// 头部总长度 (比特)。
/// 头部始终写入每个像素的全部通道，与通道模式无关。
pub const HEADER_BITS: usize = FILE_TYPE_BITS + MODE_BITS + NAME_BITS + 2 * OFFSET_BITS;

const _: () = assert!(HEADER_BITS == 580);

/// 各字段在头部中的起始位置。
pub const MODE_OFFSET: usize = FILE_TYPE_BITS;
pub const NAME_OFFSET: usize = MODE_OFFSET + MODE_BITS;
pub const START_OFFSET: usize = NAME_OFFSET + NAME_BITS;
pub const END_OFFSET: usize = START_OFFSET + OFFSET_BITS;

/// 文件名最多可占用的字节数。
pub const MAX_NAME_LEN: usize = NAME_BITS / BITS_PER_BYTE;

/// 未指定输出路径时，隐写结果图像的文件名前缀和扩展名。
pub const DOCTORED_PREFIX: &str = "doctored_";
pub const DOCTORED_EXTENSION: &str = "png";

/// 未指定输出路径时，恢复出的文件名前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";

/// 建议缩放尺寸时额外预留的通道数，用于吸收像素奇偶取整带来的误差。
pub const RESIZE_SLACK_CHANNELS: usize = 4 * CHANNELS_PER_PIXEL;
