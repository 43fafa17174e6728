use crate::bits::{self, BitSequence};
use crate::capacity;
use crate::carrier::{Carrier, CarrierMut, scan_order};
use crate::constants::{BITS_PER_BYTE, HEADER_BITS};
use crate::error::{Result, StegoError};
use crate::header::{ChannelMode, Header, PayloadKind};
use crate::payload::Payload;
use log::debug;

/// 编码器和解码器共用的扫描阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// 头部区域，每个通道都承载一个比特。
    Header,
    /// 载荷区域，由通道模式决定像素是否承载比特。
    Payload,
    Done,
}

impl Phase {
    fn start(end: usize) -> Self {
        if end == 0 { Phase::Done } else { Phase::Header }
    }

    fn carries(self, mode: ChannelMode, pixel: usize) -> bool {
        match self {
            Phase::Header => true,
            Phase::Payload => mode.selects(pixel),
            Phase::Done => false,
        }
    }

    /// 已处理 `count` 个比特后的阶段。
    fn after(count: usize, end: usize) -> Self {
        if count >= end {
            Phase::Done
        } else if count >= HEADER_BITS {
            Phase::Payload
        } else {
            Phase::Header
        }
    }
}

fn set_lsb(value: u8, bit: bool) -> u8 {
    if bit { value | 1 } else { value & !1 }
}

/// 将数据流 (头部 ++ 载荷) 写入图像各通道的最低有效位。
///
/// 写入前先核对容量，容量不足时图像保持不变。
pub fn embed<C: CarrierMut + ?Sized>(
    carrier: &mut C,
    stream: &[bool],
    mode: ChannelMode,
) -> Result<()> {
    let (width, height) = carrier.dimensions();
    let available = capacity::max_bits(width, height, mode);
    if stream.len() > available {
        return Err(StegoError::ImageTooSmall {
            required: stream.len(),
            available,
        });
    }

    let mut phase = Phase::start(stream.len());
    let mut written = 0;

    for (pixel, (x, y)) in scan_order(width, height).enumerate() {
        if phase == Phase::Done {
            break;
        }

        let mut rgb = carrier.rgb(x, y);
        for channel in rgb.iter_mut() {
            if !phase.carries(mode, pixel) {
                continue;
            }
            *channel = set_lsb(*channel, stream[written]);
            written += 1;
            phase = Phase::after(written, stream.len());
        }
        carrier.set_rgb(x, y, rgb);
    }

    debug!("Embedded {written} bits into a {width}x{height} image ({mode})");
    Ok(())
}

/// 按与 [`embed`] 相同的顺序读取最低有效位，返回头部和载荷比特。
///
/// 先无条件读取 [`HEADER_BITS`] 个比特解析头部，再从中断处继续，
/// 按头部记录的通道模式读取载荷，直到达到结束偏移。
pub fn extract<C: Carrier + ?Sized>(carrier: &C) -> Result<(Header, BitSequence)> {
    let (width, height) = carrier.dimensions();
    let mut header_bits = Vec::with_capacity(HEADER_BITS);
    let mut payload_bits = Vec::new();
    let mut header: Option<Header> = None;
    let mut mode = ChannelMode::AllPixels;
    let mut end = HEADER_BITS;
    let mut phase = Phase::start(end);
    let mut read = 0;

    for (pixel, (x, y)) in scan_order(width, height).enumerate() {
        if phase == Phase::Done {
            break;
        }

        for value in carrier.rgb(x, y) {
            if !phase.carries(mode, pixel) {
                continue;
            }
            let bit = value & 1 == 1;
            match phase {
                Phase::Header => header_bits.push(bit),
                Phase::Payload => payload_bits.push(bit),
                Phase::Done => {}
            }
            read += 1;

            if read == HEADER_BITS {
                let parsed = Header::parse(&header_bits)?;
                let available = capacity::max_bits(width, height, parsed.mode);
                if parsed.enc_end > available {
                    return Err(StegoError::TruncatedPayload {
                        expected: parsed.payload_bits(),
                        found: available.saturating_sub(HEADER_BITS),
                    });
                }
                debug!(
                    "Parsed header: {:?} payload of {} bits ({})",
                    parsed.kind,
                    parsed.payload_bits(),
                    parsed.mode
                );
                mode = parsed.mode;
                end = parsed.enc_end;
                payload_bits.reserve(parsed.payload_bits());
                header = Some(parsed);
            }
            phase = Phase::after(read, end);
        }
    }

    let header = header.ok_or(StegoError::TruncatedPayload {
        expected: HEADER_BITS,
        found: read,
    })?;
    if read < end {
        return Err(StegoError::TruncatedPayload {
            expected: header.payload_bits(),
            found: payload_bits.len(),
        });
    }

    Ok((header, payload_bits))
}

/// 构造头部并把载荷隐藏到图像中。
///
/// # Errors
///
/// * 头部无法构造 (如文件名过长)。
/// * 图像容量不足时返回 [`StegoError::PayloadTooLarge`]，此时图像不会被修改。
pub fn hide<C: CarrierMut + ?Sized>(
    carrier: &mut C,
    payload: &Payload,
    mode: ChannelMode,
) -> Result<Header> {
    let data = payload.to_bits();
    let header = Header::build(payload.kind(), mode, payload.name(), data.len())?;

    let (width, height) = carrier.dimensions();
    let required = capacity::required_bits(data.len());
    let available = capacity::max_bits(width, height, mode);
    if !capacity::fits(required, available) {
        return Err(StegoError::PayloadTooLarge {
            required,
            available,
        });
    }

    let mut stream = header.to_bits()?;
    stream.extend(data);
    embed(carrier, &stream, mode)?;

    Ok(header)
}

/// 从图像中恢复隐藏的文本或文件。
pub fn reveal<C: Carrier + ?Sized>(carrier: &C) -> Result<Payload> {
    let (header, payload_bits) = extract(carrier)?;

    let remainder = payload_bits.len() % BITS_PER_BYTE;
    if remainder != 0 {
        return Err(StegoError::TruncatedPayload {
            expected: payload_bits.len() + BITS_PER_BYTE - remainder,
            found: payload_bits.len(),
        });
    }

    Ok(match header.kind {
        PayloadKind::Text => Payload::Text(bits::bits_to_text(&payload_bits)?),
        PayloadKind::File => Payload::File {
            name: header.name.unwrap_or_default(),
            data: bits::bits_to_bytes(&payload_bits)?,
        },
    })
}
