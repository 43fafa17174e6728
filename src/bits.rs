use crate::constants::BITS_PER_BYTE;
use crate::error::{Result, StegoError};

/// 按顺序排列的单个比特，`true` 表示 1。
pub type BitSequence = Vec<bool>;

/// 将文本按 UTF-8 字节转换为比特序列，每个字节高位在前。
pub fn text_to_bits(text: &str) -> BitSequence {
    bytes_to_bits(text.as_bytes())
}

/// 将原始字节转换为比特序列，每个字节高位在前。
pub fn bytes_to_bits(bytes: &[u8]) -> BitSequence {
    bytes
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1 == 1))
        .collect()
}

pub fn bits_to_bytes(bits: &[bool]) -> Result<Vec<u8>> {
    if bits.len() % BITS_PER_BYTE != 0 {
        return Err(StegoError::MalformedBitCount(bits.len()));
    }

    Ok(bits
        .chunks_exact(BITS_PER_BYTE)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
        .collect())
}

pub fn bits_to_text(bits: &[bool]) -> Result<String> {
    Ok(String::from_utf8(bits_to_bytes(bits)?)?)
}

/// 将 `value` 转换为恰好 `width` 位的比特序列，高位补零。
///
/// # Errors
///
/// 如果 `value` 的二进制表示超过 `width` 位，返回 [`StegoError::ValueTooWide`]。
pub fn int_to_bits(value: u64, width: usize) -> Result<BitSequence> {
    let natural = (u64::BITS - value.leading_zeros()) as usize;
    if natural > width {
        return Err(StegoError::ValueTooWide { value, width });
    }

    Ok((0..width)
        .rev()
        .map(|shift| shift < 64 && (value >> shift) & 1 == 1)
        .collect())
}

/// 按无符号大端解释比特序列。超过 64 位时只保留低 64 位。
pub fn bits_to_int(bits: &[bool]) -> u64 {
    bits.iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit))
}

/// 在 `bits` 前补零直到恰好 `width` 位。调用方需保证 `bits.len() <= width`。
pub(crate) fn pad_leading(bits: &[bool], width: usize) -> BitSequence {
    let mut padded = vec![false; width.saturating_sub(bits.len())];
    padded.extend_from_slice(bits);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> BitSequence {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn text_is_msb_first_per_character() {
        assert_eq!(text_to_bits("hi"), parse("0110100001101001"));
        assert_eq!(text_to_bits("").len(), 0);
    }

    #[test]
    fn bytes_and_text_share_bit_order() {
        assert_eq!(bytes_to_bits(b"A\x01"), parse("0100000100000001"));
        assert_eq!(bytes_to_bits(b"AB"), text_to_bits("AB"));
    }

    #[test]
    fn bits_group_back_into_bytes() {
        let bytes = bits_to_bytes(&parse("1111111100000001")).unwrap();
        assert_eq!(bytes, vec![0xFF, 0x01]);
        assert_eq!(bits_to_text(&text_to_bits("stego")).unwrap(), "stego");
    }

    #[test]
    fn unaligned_bits_are_rejected() {
        assert!(matches!(
            bits_to_bytes(&parse("1010101")),
            Err(StegoError::MalformedBitCount(7))
        ));
    }

    #[test]
    fn invalid_utf8_is_reported() {
        assert!(matches!(
            bits_to_text(&bytes_to_bits(&[0xC3, 0x28])),
            Err(StegoError::InvalidText(_))
        ));
    }

    #[test]
    fn integers_are_left_padded() {
        assert_eq!(int_to_bits(1, 3).unwrap(), parse("001"));
        assert_eq!(int_to_bits(0, 4).unwrap(), parse("0000"));
        assert_eq!(int_to_bits(580, 32).unwrap().len(), 32);
        assert_eq!(bits_to_int(&int_to_bits(580, 32).unwrap()), 580);
        assert_eq!(bits_to_int(&int_to_bits(u64::MAX, 64).unwrap()), u64::MAX);
    }

    #[test]
    fn integers_wider_than_field_fail() {
        assert!(matches!(
            int_to_bits(8, 3),
            Err(StegoError::ValueTooWide { value: 8, width: 3 })
        ));
        assert!(int_to_bits(7, 3).is_ok());
    }

    #[test]
    fn padding_prepends_zero_bits() {
        assert_eq!(pad_leading(&parse("11"), 4), parse("0011"));
        assert_eq!(pad_leading(&parse("11"), 2), parse("11"));
    }
}
