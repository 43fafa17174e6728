//! # 命令处理逻辑模块
//!
//! 包含处理 `hide` 和 `recover` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、容量检查与缩放、调用核心隐写算法以及向用户报告结果。

use crate::capacity;
use crate::cli::{HideArgs, RecoverArgs, ResizePolicy};
use crate::constants::{DOCTORED_EXTENSION, DOCTORED_PREFIX, RECOVERED_PREFIX};
use crate::error::StegoError;
use crate::header::{ChannelMode, Header};
use crate::payload::Payload;
use crate::steganography::{hide, reveal};
use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Confirm;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和载荷、检查隐写空间是否足够 (必要时按策略放大图像)、
/// 调用隐写核心函数写入头部和数据，最后将结果保存为无损格式的图像。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径及隐写选项的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输入图像或载荷文件不存在或无法读取。
/// * 输出文件已存在且未指定 `--force`，或输出格式不是无损格式。
/// * 图像空间不足且未接受 (或无法通过) 缩放。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_doctored_path(&args.image));
    ensure_writable(&dest, args.force)?;
    ensure_lossless(&dest)?;
    ensure_exists(&args.image)?;

    let payload = load_payload(&args)?;

    let mut picture = image::open(&args.image)
        .with_context(|| {
            format!(
                "Unable to read image file: {}",
                args.image.to_string_lossy().red().bold()
            )
        })?
        .to_rgb8();

    // 先构造头部，文件名等元数据错误要在容量检查和缩放之前暴露
    let header = Header::build(payload.kind(), args.mode, payload.name(), payload.bit_len())?;
    let required = capacity::required_bits(header.payload_bits());
    let (width, height) = picture.dimensions();
    let available = capacity::max_bits(width, height, args.mode);
    info!("Payload needs {required} bits, {width}x{height} image offers {available} bits");

    if !capacity::fits(required, available) {
        picture = offer_resize(picture, args.mode, required, args.resize)?;
    }

    hide(&mut picture, &payload, args.mode)
        .context("Failed to hide the payload in the image.")?;

    picture.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} bits have been successfully hidden and saved: {}",
        header.payload_bits().to_string().green(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、解析头部并提取载荷。
/// 文本载荷默认打印到终端，文件载荷写入由头部中的文件名推导出的路径。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中没有可识别的头部，或载荷不完整。
/// * 输出文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    ensure_exists(&args.image)?;

    let picture = image::open(&args.image)
        .with_context(|| {
            format!(
                "Unable to read image file: {}",
                args.image.to_string_lossy().red().bold()
            )
        })?
        .to_rgb8();

    let payload = reveal(&picture).with_context(|| {
        format!(
            "Failed to recover hidden data from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    match payload {
        Payload::Text(text) => match args.output {
            Some(path) => {
                write_output(&path, text.as_bytes(), args.force)?;
                println!(
                    "The text has been successfully recovered and saved: {}",
                    path.to_string_lossy().green().bold()
                );
            }
            None => println!("{text}"),
        },
        Payload::File { name, data } => {
            let path = args
                .output
                .unwrap_or_else(|| default_recovered_path(&args.image, &name));
            write_output(&path, &data, args.force)?;
            println!(
                "The file {} has been successfully recovered and saved: {}",
                name.yellow(),
                path.to_string_lossy().green().bold()
            );
        }
    }

    Ok(())
}

fn load_payload(args: &HideArgs) -> Result<Payload> {
    match (&args.message, &args.file) {
        (Some(text), None) => Ok(Payload::Text(text.clone())),
        (None, Some(path)) => {
            ensure_exists(path)?;
            let data = fs::read(path).with_context(|| {
                format!(
                    "Unable to read file: {}",
                    path.to_string_lossy().red().bold()
                )
            })?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Payload::File { name, data })
        }
        _ => anyhow::bail!("Exactly one of a text message or a file must be given."),
    }
}

/// 按策略放大图像，使其足以容纳 `required` 比特。
///
/// 隐写核心从不改变图像尺寸，缩放只在这里发生，并在缩放后重新检查容量。
fn offer_resize(
    picture: RgbImage,
    mode: ChannelMode,
    required: usize,
    policy: ResizePolicy,
) -> Result<RgbImage> {
    let (width, height) = picture.dimensions();
    let available = capacity::max_bits(width, height, mode);
    let too_large = StegoError::PayloadTooLarge {
        required,
        available,
    };

    let Some((new_width, new_height)) =
        capacity::suggest_dimensions(width, height, mode, required)
    else {
        return Err(too_large.into());
    };

    let accepted = match policy {
        ResizePolicy::Always => true,
        ResizePolicy::Never => false,
        ResizePolicy::Ask => Confirm::new()
            .with_prompt(format!(
                "The image is too small ({required} bits needed, {available} available). Resize it from {width}x{height} to {new_width}x{new_height}?"
            ))
            .default(false)
            .interact()
            .context("Unable to read the answer to the resize prompt.")?,
    };
    if !accepted {
        return Err(too_large.into());
    }

    warn!("Resizing carrier from {width}x{height} to {new_width}x{new_height}");
    let resized = resize_to_fit(&picture, mode, required, (new_width, new_height))?;

    println!(
        "The image has been resized to {}",
        format!("{new_width}x{new_height}").yellow().bold()
    );
    Ok(resized)
}

/// 缩放到指定尺寸后重新检查容量，建议尺寸并不保证一定够用。
fn resize_to_fit(
    picture: &RgbImage,
    mode: ChannelMode,
    required: usize,
    (new_width, new_height): (u32, u32),
) -> Result<RgbImage> {
    let resized = imageops::resize(picture, new_width, new_height, FilterType::Lanczos3);

    let available = capacity::max_bits(new_width, new_height, mode);
    if !capacity::fits(required, available) {
        return Err(StegoError::StillTooSmall {
            width: new_width,
            height: new_height,
            required,
            available,
        }
        .into());
    }
    Ok(resized)
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(StegoError::InputNotFound(path.to_path_buf()).into());
    }
    Ok(())
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 有损格式会重新量化像素值，隐藏的最低有效位随之丢失。
fn ensure_lossless(path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| StegoError::LossyOutputFormat(path.to_path_buf()))?;

    match format {
        ImageFormat::Png
        | ImageFormat::Bmp
        | ImageFormat::Tiff
        | ImageFormat::WebP
        | ImageFormat::Qoi => Ok(()),
        _ => Err(StegoError::LossyOutputFormat(path.to_path_buf()).into()),
    }
}

fn write_output(path: &Path, data: &[u8], force: bool) -> Result<()> {
    ensure_writable(path, force)?;
    fs::write(path, data).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `dir/original.bmp` -> `dir/doctored_original.png`
fn default_doctored_path(image: &Path) -> PathBuf {
    image.with_file_name(format!(
        "{DOCTORED_PREFIX}{}.{DOCTORED_EXTENSION}",
        file_stem(image)
    ))
}

/// `dir/doctored_original.png` + `notes.txt` -> `dir/recovered_doctored_original.txt`
fn default_recovered_path(image: &Path, name: &str) -> PathBuf {
    let base = format!("{RECOVERED_PREFIX}{}", file_stem(image));
    let file_name = match Path::new(name).extension() {
        Some(ext) => format!("{base}.{}", ext.to_string_lossy()),
        None => base,
    };
    image.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_sit_next_to_the_image() {
        let image = Path::new("/tmp/pics/original.bmp");
        assert_eq!(
            default_doctored_path(image),
            PathBuf::from("/tmp/pics/doctored_original.png")
        );
        assert_eq!(
            default_recovered_path(Path::new("/tmp/pics/doctored_original.png"), "notes.txt"),
            PathBuf::from("/tmp/pics/recovered_doctored_original.txt")
        );
        assert_eq!(
            default_recovered_path(image, "README"),
            PathBuf::from("/tmp/pics/recovered_original")
        );
    }

    #[test]
    fn capacity_is_rechecked_after_resize() {
        let picture = RgbImage::new(10, 10);
        let required = capacity::required_bits(10_000);

        let err = resize_to_fit(&picture, ChannelMode::AllPixels, required, (12, 12)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StegoError>(),
            Some(StegoError::StillTooSmall {
                width: 12,
                height: 12,
                available: 432,
                ..
            })
        ));

        let (w, h) = capacity::suggest_dimensions(10, 10, ChannelMode::AllPixels, required).unwrap();
        let resized = resize_to_fit(&picture, ChannelMode::AllPixels, required, (w, h)).unwrap();
        assert_eq!(resized.dimensions(), (w, h));
    }

    #[test]
    fn declined_resize_reports_payload_too_large() {
        let picture = RgbImage::new(10, 10);
        let err = offer_resize(
            picture,
            ChannelMode::EveryOtherPixel,
            capacity::required_bits(2_000),
            ResizePolicy::Never,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StegoError>(),
            Some(StegoError::PayloadTooLarge {
                required: 2_580,
                available: 300
            })
        ));
    }

    #[test]
    fn only_lossless_outputs_are_allowed() {
        for ok in ["a.png", "a.bmp", "a.tiff", "a.webp", "a.qoi"] {
            assert!(ensure_lossless(Path::new(ok)).is_ok(), "{ok}");
        }
        for lossy in ["a.jpg", "a.jpeg", "a.gif", "a"] {
            assert!(ensure_lossless(Path::new(lossy)).is_err(), "{lossy}");
        }
    }
}
