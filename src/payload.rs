use crate::bits::{self, BitSequence};
use crate::constants::BITS_PER_BYTE;
use crate::header::PayloadKind;

/// 待隐藏或已恢复的数据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    File { name: String, data: Vec<u8> },
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Text(_) => PayloadKind::Text,
            Payload::File { .. } => PayloadKind::File,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Payload::Text(_) => None,
            Payload::File { name, .. } => Some(name),
        }
    }

    /// 载荷比特数，无需展开比特序列。
    pub fn bit_len(&self) -> usize {
        let bytes = match self {
            Payload::Text(text) => text.len(),
            Payload::File { data, .. } => data.len(),
        };
        bytes * BITS_PER_BYTE
    }

    pub fn to_bits(&self) -> BitSequence {
        match self {
            Payload::Text(text) => bits::text_to_bits(text),
            Payload::File { data, .. } => bits::bytes_to_bits(data),
        }
    }
}
