//! Ayala Edge - 餐厅前台设备引擎
//!
//! # 架构概述
//!
//! 每台前台设备 (平板、收银、厨房屏) 运行一个引擎实例，通过三个同步集合
//! (`tables`、`menus`、`users`) 与其他设备共享状态：
//!
//! - **桌台** (`tables`): 桌台生命周期状态机与楼面服务
//! - **点单** (`orders`): 修饰规则表、定制草稿、加入桌台
//! - **菜单** (`menus`): 菜单激活、分类与菜品编辑
//! - **员工** (`staff`): PIN 登录与管理员权限
//! - **打印** (`printing`): 厨房单与账单，先确认后提交
//! - **概览** (`summary`): 营业额与厨房队列
//!
//! # 模块结构
//!
//! ```text
//! ayala-edge/src/
//! ├── core/          # 配置、状态、错误
//! ├── tables/        # 生命周期 + FloorService
//! ├── orders/        # 修饰规则 + 定制 + OrderService
//! ├── menus/         # 菜单操作 + MenuService
//! ├── staff/         # 登录、权限、用户管理
//! ├── printing/      # 渲染 + PrintService
//! ├── summary.rs     # 概览
//! └── utils/         # 日志
//! ```

pub mod core;
pub mod menus;
pub mod orders;
pub mod printing;
pub mod staff;
pub mod summary;
pub mod tables;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, EdgeState, FloorError, FloorResult};
pub use menus::{MenuError, MenuService};
pub use orders::{CompositionError, CustomizationDraft, ModifierCatalog, OrderService};
pub use printing::{PendingPrint, PrintKind, PrintService};
pub use staff::{AuthError, StaffService, StaffSession};
pub use summary::{FloorSummary, KitchenEntry, Urgency, kitchen_queue};
pub use tables::{CloseOutcome, FloorService, LifecycleError};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env、读取配置、创建工作目录、初始化日志
pub fn setup_environment() -> anyhow::Result<Config> {
    // .env is optional
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = config.log_dir();
    init_logger_with_file(&config.log_level, config.log_json, Some(log_dir.as_path()))?;

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    _               _
   / \  _   _  __ _| | __ _
  / _ \| | | |/ _` | |/ _` |
 / ___ \ |_| | (_| | | (_| |
/_/   \_\__, |\__,_|_|\__,_|
        |___/   edge
    "#
    );
}
