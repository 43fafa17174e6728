//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::header::ChannelMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复文本和文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复文本和文件。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏) 和 recover (恢复)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏一段文本或一个文件。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本或文件。
    Recover(RecoverArgs),
}

/// 图像容量不足时如何处理缩放建议。
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResizePolicy {
    /// 交互式询问是否放大图像。
    Ask,
    /// 直接按建议尺寸放大。
    Always,
    /// 不放大，直接报错。
    Never,
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本。
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    pub message: Option<String>,

    /// 要隐藏的文件路径，文件名 (不超过 64 字节) 会一并写入头部。
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// 隐写完成后，保存结果图像的输出路径。默认为输入图像旁的 `doctored_<name>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 头部之后哪些像素承载数据。
    #[arg(long, value_enum, default_value_t = ChannelMode::AllPixels)]
    pub mode: ChannelMode,

    /// 容量不足时是否放大图像。
    #[arg(long, value_enum, default_value_t = ResizePolicy::Ask)]
    pub resize: ResizePolicy,

    /// 输出文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复内容的输出路径。文本默认直接打印，文件默认保存为 `recovered_<image>.<ext>`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,
}
