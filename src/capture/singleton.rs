use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::{error, info};

use crate::capture::{CaptureError, CaptureService, PrimaryMonitor, ScreenSource};

/// 双重检查的一次性初始化单元
///
/// 已初始化时走无锁的快路径；首次初始化在互斥区内再检查一次，
/// 保证并发首访时只构造一次。初始化失败不会被缓存，下次调用会重试。
pub struct InitCell<T> {
    value: OnceLock<T>,
    init_lock: Mutex<()>,
}

impl<T> InitCell<T> {
    pub const fn new() -> Self {
        Self {
            value: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn get_or_try_init<E, F>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        // 构造过程中 panic 不影响后续重试
        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let value = init()?;
        Ok(self.value.get_or_init(|| value))
    }
}

impl<T> Default for InitCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

type Connect<S> = Box<dyn Fn() -> Result<S, CaptureError> + Send + Sync>;

/// 截图服务的唯一实例槽
///
/// 由程序入口创建并以引用传递，首次 `get_instance` 时才绑定平台截图能力
pub struct ServiceSlot<S> {
    cell: InitCell<CaptureService<S>>,
    connect: Connect<S>,
    default_dir: PathBuf,
}

impl<S: ScreenSource> ServiceSlot<S> {
    pub fn new<F>(default_dir: PathBuf, connect: F) -> Self
    where
        F: Fn() -> Result<S, CaptureError> + Send + Sync + 'static,
    {
        Self {
            cell: InitCell::new(),
            connect: Box::new(connect),
            default_dir,
        }
    }

    /// 获取共享的截图服务，首次调用时构造
    pub fn get_instance(&self) -> Result<&CaptureService<S>, CaptureError> {
        self.cell.get_or_try_init(|| {
            info!("Initializing capture service...");
            let source = (self.connect)().inspect_err(|e| {
                error!("Failed to initialize capture service: {}", e);
            })?;
            Ok(CaptureService::new(source, self.default_dir.clone()))
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl ServiceSlot<PrimaryMonitor> {
    /// 绑定主显示器的服务槽
    pub fn primary(default_dir: PathBuf) -> Self {
        Self::new(default_dir, PrimaryMonitor::open)
    }
}
