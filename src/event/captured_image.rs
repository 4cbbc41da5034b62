use chrono::{DateTime, Local};
use image::RgbaImage;

/// 一次截图的内存结果
///
/// 由调用方独占持有，服务本身不保留任何引用
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub image: RgbaImage,
    pub timestamp: DateTime<Local>,
}

impl CapturedImage {
    pub fn new(image: RgbaImage, timestamp: DateTime<Local>) -> Self {
        Self { image, timestamp }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// 宽高都为正才算有效图像
    pub fn is_valid(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}
