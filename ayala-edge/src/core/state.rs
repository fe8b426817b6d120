use std::sync::{Arc, Mutex};

use ayala_printer::FilePrinter;
use ayala_sync::remote::join_path;
use ayala_sync::{LocalCache, MemoryRemote, RemoteConfig, RemoteStore, SyncedStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::seed::{default_menus, default_tables, default_users};
use tokio::task::JoinHandle;

use crate::core::{Config, FloorResult};
use crate::menus::MenuService;
use crate::orders::{ModifierCatalog, OrderService};
use crate::printing::PrintService;
use crate::staff::StaffService;
use crate::tables::FloorService;

pub const TABLES_PATH: &str = "tables";
pub const MENUS_PATH: &str = "menus";
pub const USERS_PATH: &str = "users";

/// 设备状态 - 持有三个同步集合和所有服务
///
/// Clone 是浅拷贝；所有服务共享同一组 store。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | floor | 桌台操作 (`tables` 集合) |
/// | menus | 菜单操作 (`menus` 集合) |
/// | staff | 登录与用户管理 (`users` 集合) |
/// | orders | 点单：定制 + 加入桌台 |
/// | printing | 厨房单/账单 打印确认流程 |
/// | printer | 打印输出 (work_dir/prints) |
#[derive(Clone, Debug)]
pub struct EdgeState {
    pub config: Config,
    pub floor: FloorService,
    pub menus: MenuService,
    pub staff: StaffService,
    pub orders: OrderService,
    pub printing: PrintService,
    pub printer: FilePrinter,
    mirrors: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl EdgeState {
    /// 初始化设备状态
    ///
    /// 1. 远程存储: `REMOTE_URL` 已设置时使用 HTTP，否则使用内存存储
    /// 2. 三个集合: 本地快照优先，其次内置默认数据
    /// 3. 各服务
    ///
    /// 必须在 Tokio runtime 内调用。
    pub fn initialize(config: &Config) -> FloorResult<Self> {
        let remote: Arc<dyn RemoteStore> = match &config.remote_url {
            Some(url) => {
                let mut remote_config =
                    RemoteConfig::new(url.as_str()).with_timeout(config.remote_timeout_secs);
                if let Some(token) = &config.remote_auth_token {
                    remote_config = remote_config.with_auth_token(token.as_str());
                }
                tracing::info!(url = %url, root = %config.remote_root, "Using hosted realtime store");
                Arc::new(remote_config.build_http_remote()?)
            }
            None => {
                tracing::warn!("REMOTE_URL not set, running standalone on an in-memory store");
                Arc::new(MemoryRemote::new())
            }
        };
        Ok(Self::with_remote(config, remote))
    }

    /// Build the state on an existing remote (shared in-memory remotes in tests)
    pub fn with_remote(config: &Config, remote: Arc<dyn RemoteStore>) -> Self {
        let mut mirrors = Vec::new();
        let tables = connect_cached(config, &remote, TABLES_PATH, default_tables(), &mut mirrors);
        let menus = connect_cached(config, &remote, MENUS_PATH, default_menus(), &mut mirrors);
        let users = connect_cached(config, &remote, USERS_PATH, default_users(), &mut mirrors);

        let floor = FloorService::new(tables);
        let menus = MenuService::new(menus);
        let staff = StaffService::new(users);
        let orders = OrderService::new(menus.clone(), floor.clone(), ModifierCatalog::builtin());
        let printing = PrintService::new(
            floor.clone(),
            config.timezone,
            config.receipt_title.clone(),
        );

        Self {
            config: config.clone(),
            floor,
            menus,
            staff,
            orders,
            printing,
            printer: FilePrinter::new(config.print_dir()),
            mirrors: Arc::new(Mutex::new(mirrors)),
        }
    }

    /// Wait until every collection has heard from the remote once
    pub async fn wait_ready(&self) {
        self.floor.store().wait_ready().await;
        self.menus.store().wait_ready().await;
        self.staff.store().wait_ready().await;
    }

    /// Wait until every write issued so far has been attempted
    pub async fn settle(&self) {
        self.floor.store().settle().await;
        self.menus.store().settle().await;
        self.staff.store().settle().await;
    }

    /// Stop listening, drain pending writes and flush the local snapshots
    pub async fn shutdown(&self) {
        self.floor.store().shutdown();
        self.menus.store().shutdown();
        self.staff.store().shutdown();
        self.settle().await;

        let mirrors = match self.mirrors.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for handle in mirrors {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Snapshot task failed");
            }
        }
        tracing::info!("Edge state shut down");
    }
}

/// Connect one collection, starting from its local snapshot when readable.
fn connect_cached<T>(
    config: &Config,
    remote: &Arc<dyn RemoteStore>,
    name: &str,
    initial: T,
    mirrors: &mut Vec<JoinHandle<()>>,
) -> SyncedStore<T>
where
    T: Serialize + DeserializeOwned + PartialEq + Send + Sync + 'static,
{
    let cache = LocalCache::new(config.cache_dir(), name);
    let cached = cache.load::<T>();
    if cached.is_some() {
        tracing::info!(collection = name, "Starting from local snapshot");
    }
    let store = SyncedStore::connect_with_state(
        remote.clone(),
        join_path(&config.remote_root, name),
        initial,
        cached,
    );
    mirrors.push(cache.mirror(&store));
    store
}
