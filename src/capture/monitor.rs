use std::fmt;

use image::RgbaImage;
use tracing::{debug, info};
use xcap::Monitor;

use crate::capture::CaptureError;

/// 平台截图能力的抽象
///
/// 实现方持有平台句柄，构造后只读
pub trait ScreenSource {
    /// 当前显示器的像素尺寸
    fn screen_size(&self) -> Result<(u32, u32), CaptureError>;

    /// 截取整个显示器
    fn grab(&self) -> Result<RgbaImage, CaptureError>;
}

/// 基于 xcap 的主显示器截图
pub struct PrimaryMonitor {
    monitor: Monitor,
}

impl PrimaryMonitor {
    /// 绑定主显示器，找不到主显示器时退回第一个
    pub fn open() -> Result<Self, CaptureError> {
        let monitors = Monitor::all()
            .map_err(|e| CaptureError::PlatformUnavailable(format!("{:?}", e)))?;

        let mut fallback = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                return Ok(Self::bind(monitor));
            }
            if fallback.is_none() {
                fallback = Some(monitor);
            }
        }

        fallback
            .map(Self::bind)
            .ok_or_else(|| CaptureError::PlatformUnavailable("No monitor detected".to_string()))
    }

    fn bind(monitor: Monitor) -> Self {
        info!(
            "Bound screen capture to monitor {}",
            monitor.name().unwrap_or_else(|_| "Unknown".to_string())
        );
        Self { monitor }
    }
}

impl ScreenSource for PrimaryMonitor {
    fn screen_size(&self) -> Result<(u32, u32), CaptureError> {
        let width = self
            .monitor
            .width()
            .map_err(|e| CaptureError::CaptureFailed(format!("{:?}", e)))?;
        let height = self
            .monitor
            .height()
            .map_err(|e| CaptureError::CaptureFailed(format!("{:?}", e)))?;
        Ok((width, height))
    }

    fn grab(&self) -> Result<RgbaImage, CaptureError> {
        self.monitor
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed(format!("{:?}", e)))
    }
}

/// 显示器信息快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

impl fmt::Display for MonitorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{} at ({}, {})",
            self.name, self.width, self.height, self.x, self.y
        )?;
        if self.is_primary {
            write!(f, " [primary]")?;
        }
        Ok(())
    }
}

/// 列出所有可识别的显示器
pub fn list_monitors() -> Result<Vec<MonitorInfo>, CaptureError> {
    let monitors =
        Monitor::all().map_err(|e| CaptureError::PlatformUnavailable(format!("{:?}", e)))?;

    Ok(monitors
        .iter()
        .map(|m| MonitorInfo {
            name: m.name().unwrap_or_else(|_| "Unknown".to_string()),
            x: m.x().unwrap_or(0),
            y: m.y().unwrap_or(0),
            width: m.width().unwrap_or(0),
            height: m.height().unwrap_or(0),
            is_primary: m.is_primary().unwrap_or(false),
        })
        .collect())
}

/// 检查当前环境是否具备图形界面
///
/// 与截图服务无关，不会构造服务实例
pub fn has_display() -> bool {
    if !display_server_configured(|key| std::env::var_os(key)) {
        debug!("No display server configured");
        return false;
    }

    match Monitor::all() {
        Ok(monitors) => !monitors.is_empty(),
        Err(e) => {
            debug!("Monitor enumeration failed: {:?}", e);
            false
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn display_server_configured<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<std::ffi::OsString>,
{
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|key| lookup(key).is_some_and(|value| !value.is_empty()))
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn display_server_configured<F>(_lookup: F) -> bool
where
    F: Fn(&str) -> Option<std::ffi::OsString>,
{
    true
}
