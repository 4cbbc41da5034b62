use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::capture::{CaptureService, ScreenSource, ServiceSlot};

const MENU: &str = "\
--- 截图服务 ---
1. 截图并保存
2. 截图（仅内存）
3. 查看截图次数
4. 退出
请选择 (1-4): ";

/// 交互式菜单
///
/// 每个提示读取一行输入；输入结束等同于选择退出
pub struct Shell<'a, S, R, W> {
    slot: &'a ServiceSlot<S>,
    input: R,
    output: W,
}

impl<'a, S, R, W> Shell<'a, S, R, W>
where
    S: ScreenSource,
    R: BufRead,
    W: Write,
{
    pub fn new(slot: &'a ServiceSlot<S>, input: R, output: W) -> Self {
        Self {
            slot,
            input,
            output,
        }
    }

    /// 运行菜单循环
    ///
    /// `graphical` 为 false 时只打印提示并返回，不会触碰截图服务
    pub fn run(&mut self, graphical: bool) -> Result<()> {
        if !graphical {
            writeln!(self.output, "本程序需要图形环境才能截图。")?;
            writeln!(self.output, "请在有显示器的桌面环境中运行。")?;
            return Ok(());
        }

        loop {
            write!(self.output, "{}", MENU)?;
            self.output.flush()?;

            let Some(choice) = self.read_line()? else {
                writeln!(self.output)?;
                writeln!(self.output, "再见。")?;
                return Ok(());
            };

            match choice.as_str() {
                "1" => self.capture_and_save()?,
                "2" => self.capture_in_memory()?,
                "3" => self.show_count()?,
                "4" => {
                    writeln!(self.output, "再见。")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "无效选项，请输入 1、2、3 或 4。")?,
            }
        }
    }

    fn capture_and_save(&mut self) -> Result<()> {
        let Some(service) = self.service()? else {
            return Ok(());
        };

        writeln!(
            self.output,
            "是否保存到默认目录 {}? (Y/n): ",
            service.default_dir().display()
        )?;
        let answer = self.read_line()?.unwrap_or_default().to_lowercase();

        let mut directory = None;
        if answer == "n" || answer == "no" {
            write!(self.output, "请输入目录路径: ")?;
            self.output.flush()?;
            directory = self.read_line()?.filter(|dir| !dir.is_empty());
        }

        writeln!(self.output, "正在截图...")?;
        match service.capture_and_save(directory.as_deref()) {
            Ok(Some(path)) => writeln!(self.output, "截图已保存到: {}", path.display())?,
            Ok(None) => writeln!(self.output, "错误: 没有可保存的截图。")?,
            Err(e) => writeln!(self.output, "错误: 无法保存截图: {}", e)?,
        }
        Ok(())
    }

    fn capture_in_memory(&mut self) -> Result<()> {
        let Some(service) = self.service()? else {
            return Ok(());
        };

        match service.capture_full_screen() {
            Ok(image) => {
                let (width, height) = image.dimensions();
                writeln!(
                    self.output,
                    "已在内存中截图（{}），尺寸: {} x {} 像素。",
                    image.timestamp.format("%H:%M:%S"),
                    width,
                    height
                )?
            }
            Err(e) => writeln!(self.output, "截图失败: {}", e)?,
        }
        Ok(())
    }

    fn show_count(&mut self) -> Result<()> {
        let Some(service) = self.service()? else {
            return Ok(());
        };

        writeln!(
            self.output,
            "本次会话已保存截图数: {}",
            service.capture_counter()
        )?;
        Ok(())
    }

    /// 获取服务实例，失败时打印错误并返回 None
    fn service(&mut self) -> Result<Option<&'a CaptureService<S>>> {
        let slot = self.slot;
        match slot.get_instance() {
            Ok(service) => Ok(Some(service)),
            Err(e) => {
                writeln!(self.output, "错误: 无法初始化截图服务: {}", e)?;
                Ok(None)
            }
        }
    }

    /// 读取一行并去掉首尾空白，非 UTF-8 字节按替换字符处理
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut buf)
            .context("Failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }
}
