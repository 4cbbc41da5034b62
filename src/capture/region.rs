use std::fmt;

use image::{RgbaImage, imageops};

use crate::capture::CaptureError;

/// 屏幕上的矩形区域（像素坐标，原点为所截显示器的左上角）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}x{}", self.x, self.y, self.width, self.height)
    }
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 检查区域是否完整落在 `screen_width` x `screen_height` 的屏幕内
    ///
    /// 宽高为 0 或越界都视为无效，不做裁剪
    pub fn check_within(&self, screen_width: u32, screen_height: u32) -> Result<(), CaptureError> {
        let fits = |start: u32, len: u32, limit: u32| {
            len > 0 && start.checked_add(len).is_some_and(|end| end <= limit)
        };

        if fits(self.x, self.width, screen_width) && fits(self.y, self.height, screen_height) {
            Ok(())
        } else {
            Err(CaptureError::InvalidRegion {
                region: *self,
                screen_width,
                screen_height,
            })
        }
    }

    /// 从整屏图像中截出该区域
    pub fn crop(&self, screen: &RgbaImage) -> Result<RgbaImage, CaptureError> {
        self.check_within(screen.width(), screen.height())?;
        Ok(imageops::crop_imm(screen, self.x, self.y, self.width, self.height).to_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_region_inside_screen() {
        assert!(Region::new(0, 0, 1920, 1080).check_within(1920, 1080).is_ok());
        assert!(Region::new(100, 200, 50, 50).check_within(1920, 1080).is_ok());
    }

    #[test]
    fn test_zero_sized_region() {
        assert!(Region::new(0, 0, 0, 10).check_within(100, 100).is_err());
        assert!(Region::new(0, 0, 10, 0).check_within(100, 100).is_err());
    }

    #[test]
    fn test_region_out_of_bounds() {
        let err = Region::new(90, 0, 20, 10).check_within(100, 100).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidRegion { .. }));
        assert!(Region::new(0, 95, 10, 10).check_within(100, 100).is_err());
        assert!(Region::new(u32::MAX, 0, 2, 2).check_within(100, 100).is_err());
    }

    #[test]
    fn test_crop_keeps_pixels() {
        let mut screen = RgbaImage::new(10, 10);
        screen.put_pixel(3, 4, Rgba([255, 0, 0, 255]));

        let cropped = Region::new(3, 4, 2, 2).crop(&screen).unwrap();
        assert_eq!(cropped.dimensions(), (2, 2));
        assert_eq!(cropped.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_display() {
        assert_eq!(Region::new(1, 2, 3, 4).to_string(), "(1, 2) 3x4");
    }
}
