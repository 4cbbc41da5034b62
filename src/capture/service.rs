use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Local};
use image::RgbaImage;
use tracing::{debug, error, info, warn};

use crate::capture::{CaptureError, Region, ScreenSource};
use crate::event::CapturedImage;

/// 默认保存目录名（位于用户主目录下）
pub const DEFAULT_DIR_NAME: &str = "CapturasPantalla";

/// 截图服务
///
/// 持有唯一的平台截图句柄和本次会话的截图计数。
/// 计数只在保存时递增，内存截图不计数。
pub struct CaptureService<S> {
    source: S,
    counter: AtomicU32,
    default_dir: PathBuf,
}

impl<S: ScreenSource> CaptureService<S> {
    pub fn new(source: S, default_dir: PathBuf) -> Self {
        info!(
            "Capture service ready, default directory: {}",
            default_dir.display()
        );
        Self {
            source,
            counter: AtomicU32::new(0),
            default_dir,
        }
    }

    /// 截取整个屏幕
    ///
    /// 以实际抓取到的图像尺寸为准（缩放显示器上即物理像素），
    /// 上报尺寸不一致时只记录日志
    pub fn capture_full_screen(&self) -> Result<CapturedImage, CaptureError> {
        let image = self.grab_screen()?;
        Ok(CapturedImage::new(image, Local::now()))
    }

    /// 截取屏幕上的矩形区域
    ///
    /// 坐标与整屏截图的像素一致。区域必须完整落在截图内，
    /// 否则返回 `InvalidRegion`，不做裁剪
    pub fn capture_region(&self, region: Region) -> Result<CapturedImage, CaptureError> {
        let screen = self.grab_screen()?;
        debug!("Capturing region {}", region);

        let image = region.crop(&screen)?;
        Ok(CapturedImage::new(image, Local::now()))
    }

    /// 保存图像到目录
    ///
    /// # 返回
    /// - `Ok(Some(path))`: 已写入文件的绝对路径
    /// - `Ok(None)`: 没有可保存的图像，计数不变
    /// - `Err`: 目录创建或图像编码失败
    ///
    /// 计数在编码之前递增，编码失败时该序号也会被消耗
    pub fn save_to_file(
        &self,
        image: Option<&CapturedImage>,
        directory: Option<&str>,
    ) -> Result<Option<PathBuf>, CaptureError> {
        let Some(image) = image.filter(|image| image.is_valid()) else {
            debug!("No image to save");
            return Ok(None);
        };

        let dir = self.resolve_dir(directory);
        fs::create_dir_all(&dir).map_err(|source| {
            error!("Failed to create directory {}: {}", dir.display(), source);
            CaptureError::DirectoryCreationFailed {
                path: dir.clone(),
                source,
            }
        })?;

        let count = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let file_path = dir.join(file_name(Local::now(), count));

        if let Err(source) = image.image.save(&file_path) {
            warn!(
                "Failed to write {}, capture number {} is consumed: {}",
                file_path.display(),
                count,
                source
            );
            return Err(CaptureError::EncodingFailed {
                path: file_path,
                source,
            });
        }

        let file_path = std::path::absolute(&file_path).unwrap_or(file_path);
        info!("Saved capture #{} to {}", count, file_path.display());
        Ok(Some(file_path))
    }

    /// 截取整屏并保存
    pub fn capture_and_save(
        &self,
        directory: Option<&str>,
    ) -> Result<Option<PathBuf>, CaptureError> {
        let image = self.capture_full_screen()?;
        self.save_to_file(Some(&image), directory)
    }

    /// 截取区域并保存
    pub fn capture_region_and_save(
        &self,
        region: Region,
        directory: Option<&str>,
    ) -> Result<Option<PathBuf>, CaptureError> {
        let image = self.capture_region(region)?;
        self.save_to_file(Some(&image), directory)
    }

    /// 本次会话已保存的截图数量
    pub fn capture_counter(&self) -> u32 {
        self.counter.load(Ordering::SeqCst)
    }

    pub fn default_dir(&self) -> &Path {
        &self.default_dir
    }

    fn grab_screen(&self) -> Result<RgbaImage, CaptureError> {
        let reported = self.source.screen_size()?;
        let image = self.source.grab()?;
        if image.width() == 0 || image.height() == 0 {
            return Err(CaptureError::CaptureFailed("Captured empty screenshot".to_string()));
        }

        if image.dimensions() != reported {
            debug!(
                "Screen reports {}x{}, captured {}x{} pixels",
                reported.0,
                reported.1,
                image.width(),
                image.height()
            );
        } else {
            debug!("Captured full screen {}x{}", reported.0, reported.1);
        }
        Ok(image)
    }

    fn resolve_dir(&self, directory: Option<&str>) -> PathBuf {
        match directory {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => self.default_dir.clone(),
        }
    }
}

/// 用户主目录下的默认保存目录
pub fn default_capture_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// 生成文件名，例如 `captura_2025-01-15_14-30-00_1.png`
fn file_name(timestamp: DateTime<Local>, count: u32) -> String {
    format!(
        "captura_{}_{}.png",
        timestamp.format("%Y-%m-%d_%H-%M-%S"),
        count
    )
}
