use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;

use crate::capture::{Region, ServiceSlot, has_display, list_monitors};
use crate::config::{Config, init};
use crate::shell::Shell;

#[derive(Parser)]
#[command(name = "screen-capture")]
#[command(about = "单例截图服务", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 日志等级 (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// 默认保存目录（默认为 ~/CapturasPantalla）
    #[arg(long, global = true)]
    pub default_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 交互式菜单（默认）
    Menu,

    /// 列出所有可识别的显示器
    ListMonitors,

    /// 截取整屏并保存
    Shot {
        /// 保存目录（不指定则使用默认目录）
        #[arg(short, long)]
        dir: Option<String>,
    },

    /// 截取屏幕区域并保存
    Region {
        x: u32,
        y: u32,
        width: u32,
        height: u32,

        /// 保存目录（不指定则使用默认目录）
        #[arg(short, long)]
        dir: Option<String>,
    },
}

/// CLI 入口函数
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_args(cli.log_level, cli.default_dir)?;
    init::init(&config.logging);
    info!("Loaded configuration: {}", config);

    let slot = ServiceSlot::primary(config.storage.default_dir.clone());

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            Shell::new(&slot, stdin.lock(), io::stdout()).run(has_display())?;
            if slot.is_initialized() {
                let count = slot.get_instance()?.capture_counter();
                info!("Session finished with {} saved captures", count);
            }
        }
        Commands::ListMonitors => {
            print_monitors()?;
        }
        Commands::Shot { dir } => {
            ensure_display()?;
            let path = slot
                .get_instance()?
                .capture_and_save(dir.as_deref())
                .context("截图保存失败")?;
            print_saved(path)?;
        }
        Commands::Region {
            x,
            y,
            width,
            height,
            dir,
        } => {
            ensure_display()?;
            let region = Region::new(x, y, width, height);
            let path = slot
                .get_instance()?
                .capture_region_and_save(region, dir.as_deref())
                .with_context(|| format!("区域 {} 截图保存失败", region))?;
            print_saved(path)?;
        }
    }

    Ok(())
}

/// 列出所有可识别的显示器
fn print_monitors() -> Result<()> {
    println!("正在扫描显示器...\n");

    let monitors = list_monitors()?;

    if monitors.is_empty() {
        println!("未检测到任何显示器");
    } else {
        println!("检测到 {} 个显示器:\n", monitors.len());
        for (idx, monitor) in monitors.iter().enumerate() {
            println!("  [{}] {}", idx + 1, monitor);
        }
    }

    Ok(())
}

fn ensure_display() -> Result<()> {
    if !has_display() {
        bail!("未检测到图形环境，无法截图");
    }
    Ok(())
}

fn print_saved(path: Option<PathBuf>) -> Result<()> {
    let path = path.context("没有可保存的截图")?;
    println!("截图已保存到: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_menu() {
        let cli = Cli::try_parse_from(["screen-capture"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_parse_region() {
        let cli = Cli::try_parse_from([
            "screen-capture",
            "region",
            "10",
            "20",
            "300",
            "200",
            "--dir",
            "/tmp/caps",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Some(Commands::Region {
                x,
                y,
                width,
                height,
                dir,
            }) => {
                assert_eq!((x, y, width, height), (10, 20, 300, 200));
                assert_eq!(dir.as_deref(), Some("/tmp/caps"));
            }
            _ => panic!("expected region command"),
        }
    }

    #[test]
    fn test_negative_region_rejected() {
        assert!(Cli::try_parse_from(["screen-capture", "region", "-1", "0", "10", "10"]).is_err());
    }
}
