//! # lsb_embed 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：比特转换、580 比特头部编解码、
//! 容量规划以及按像素通道写入/读取最低有效位的编解码状态机。

// 声明库包含的所有模块。

pub mod bits;
pub mod capacity;
pub mod carrier;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod header;
pub mod payload;
pub mod steganography;
