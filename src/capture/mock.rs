use image::{Rgba, RgbaImage};

use crate::capture::{CaptureError, ScreenSource};

/// 测试用的虚拟屏幕
///
/// 像素值编码了坐标 `(x, y)`，便于检查裁剪位置
pub struct MockScreen {
    width: u32,
    height: u32,
    scale: u32,
    fail: bool,
}

impl MockScreen {
    pub fn new(width: u32, height: u32) -> Self {
        Self::scaled(width, height, 1)
    }

    /// 上报 `width` x `height`，实际抓取 `scale` 倍的物理像素
    pub fn scaled(width: u32, height: u32, scale: u32) -> Self {
        Self {
            width,
            height,
            scale,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            width: 0,
            height: 0,
            scale: 1,
            fail: true,
        }
    }
}

impl ScreenSource for MockScreen {
    fn screen_size(&self) -> Result<(u32, u32), CaptureError> {
        if self.fail {
            return Err(CaptureError::CaptureFailed("permission denied".to_string()));
        }
        Ok((self.width, self.height))
    }

    fn grab(&self) -> Result<RgbaImage, CaptureError> {
        if self.fail {
            return Err(CaptureError::CaptureFailed("permission denied".to_string()));
        }
        Ok(RgbaImage::from_fn(
            self.width * self.scale,
            self.height * self.scale,
            |x, y| Rgba([x as u8, y as u8, 0, 255]),
        ))
    }
}
