//! # 头部编解码模块
//!
//! 头部固定为 580 比特，字段依次为：载荷类型 (1)、通道模式 (3)、
//! 文件名 (512)、起始偏移 (32)、结束偏移 (32)，每个字段高位在前。

use crate::bits::{self, BitSequence};
use crate::constants::{
    END_OFFSET, HEADER_BITS, MAX_NAME_LEN, MODE_BITS, MODE_OFFSET, NAME_BITS,
    NAME_OFFSET, OFFSET_BITS, START_OFFSET,
};
use crate::error::{Result, StegoError};
use clap::ValueEnum;
use std::fmt;

/// 头部之后哪些像素承载载荷比特。
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelMode {
    /// 每个像素的三个通道都承载载荷。
    #[value(name = "all")]
    AllPixels,
    /// 只有扫描序号为偶数的像素承载载荷。
    #[value(name = "every-other")]
    EveryOtherPixel,
}

impl ChannelMode {
    /// 扫描序号为 `pixel` 的像素在载荷区是否被选中。
    pub fn selects(self, pixel: usize) -> bool {
        match self {
            ChannelMode::AllPixels => true,
            ChannelMode::EveryOtherPixel => pixel % 2 == 0,
        }
    }

    /// 统计 `[from, to)` 范围内被选中的像素个数。
    pub fn selected_between(self, from: usize, to: usize) -> usize {
        if from >= to {
            return 0;
        }
        match self {
            ChannelMode::AllPixels => to - from,
            ChannelMode::EveryOtherPixel => to.div_ceil(2) - from.div_ceil(2),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ChannelMode::AllPixels => 0,
            ChannelMode::EveryOtherPixel => 1,
        }
    }
}

impl TryFrom<u8> for ChannelMode {
    type Error = StegoError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(ChannelMode::AllPixels),
            1 => Ok(ChannelMode::EveryOtherPixel),
            other => Err(StegoError::UnsupportedChannelMode(other)),
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelMode::AllPixels => write!(f, "all pixels"),
            ChannelMode::EveryOtherPixel => write!(f, "every other pixel"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    File,
}

/// 解析后的头部。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub kind: PayloadKind,
    pub mode: ChannelMode,
    /// 仅文件载荷带有文件名。
    pub name: Option<String>,
    /// 载荷第一个比特在数据流中的位置，恒为 [`HEADER_BITS`]。
    pub enc_start: usize,
    /// 数据流总比特数，包含头部。
    pub enc_end: usize,
}

impl Header {
    /// 根据载荷元数据构造头部。
    ///
    /// # Errors
    ///
    /// * 文件名超过 64 字节时返回 [`StegoError::NameTooLong`]。
    /// * 数据流总长度无法写入 32 位字段时返回 [`StegoError::ValueTooWide`]。
    pub fn build(
        kind: PayloadKind,
        mode: ChannelMode,
        name: Option<&str>,
        payload_bits: usize,
    ) -> Result<Self> {
        let name = match kind {
            PayloadKind::File => {
                let name = name.unwrap_or_default();
                if name.len() > MAX_NAME_LEN {
                    return Err(StegoError::NameTooLong {
                        len: name.len(),
                        max: MAX_NAME_LEN,
                    });
                }
                Some(name.to_owned())
            }
            PayloadKind::Text => None,
        };

        let enc_end = HEADER_BITS + payload_bits;
        if enc_end as u64 > u64::from(u32::MAX) {
            return Err(StegoError::ValueTooWide {
                value: enc_end as u64,
                width: OFFSET_BITS,
            });
        }

        Ok(Self {
            kind,
            mode,
            name,
            enc_start: HEADER_BITS,
            enc_end,
        })
    }

    /// 载荷部分的比特数。
    pub fn payload_bits(&self) -> usize {
        self.enc_end - self.enc_start
    }

    /// 序列化为恰好 [`HEADER_BITS`] 个比特。
    pub fn to_bits(&self) -> Result<BitSequence> {
        let mut out = Vec::with_capacity(HEADER_BITS);
        out.push(self.kind == PayloadKind::File);
        out.extend(bits::int_to_bits(u64::from(self.mode.code()), MODE_BITS)?);

        // 文本载荷只写一个 0 比特表示“无文件名”，随后补零
        let name_bits = match (&self.kind, &self.name) {
            (PayloadKind::File, Some(name)) => bits::text_to_bits(name),
            _ => vec![false],
        };
        if name_bits.len() > NAME_BITS {
            return Err(StegoError::NameTooLong {
                len: name_bits.len() / 8,
                max: MAX_NAME_LEN,
            });
        }
        out.extend(bits::pad_leading(&name_bits, NAME_BITS));

        out.extend(bits::int_to_bits(self.enc_start as u64, OFFSET_BITS)?);
        out.extend(bits::int_to_bits(self.enc_end as u64, OFFSET_BITS)?);

        debug_assert_eq!(out.len(), HEADER_BITS);
        Ok(out)
    }

    /// 从提取出的前 [`HEADER_BITS`] 个比特解析头部。
    ///
    /// 起始偏移字段不参与解析，`enc_start` 总是取头部长度。
    pub fn parse(header_bits: &[bool]) -> Result<Self> {
        if header_bits.len() != HEADER_BITS {
            return Err(StegoError::InvalidHeader(format!(
                "expected {HEADER_BITS} header bits, got {}",
                header_bits.len()
            )));
        }

        let kind = if header_bits[0] {
            PayloadKind::File
        } else {
            PayloadKind::Text
        };

        let mode_code = bits::bits_to_int(&header_bits[MODE_OFFSET..NAME_OFFSET]);
        let mode = ChannelMode::try_from(mode_code as u8)?;

        let name = match kind {
            PayloadKind::File => {
                let raw = bits::bits_to_text(&header_bits[NAME_OFFSET..START_OFFSET]).map_err(
                    |_| StegoError::InvalidHeader("file name is not valid UTF-8".to_owned()),
                )?;
                Some(raw.trim_start_matches('\0').to_owned())
            }
            PayloadKind::Text => None,
        };

        let enc_end = bits::bits_to_int(&header_bits[END_OFFSET..HEADER_BITS]) as usize;
        if enc_end < HEADER_BITS {
            return Err(StegoError::InvalidHeader(format!(
                "end offset {enc_end} lies inside the header"
            )));
        }

        Ok(Self {
            kind,
            mode,
            name,
            enc_start: HEADER_BITS,
            enc_end,
        })
    }
}
