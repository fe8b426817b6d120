use ayala_edge::{EdgeState, FloorSummary, Urgency, kitchen_queue, print_banner, setup_environment};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 配置, 工作目录, 日志)
    let config = setup_environment()?;

    print_banner();
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        timezone = %config.timezone,
        "Ayala edge starting..."
    );

    // 2. 初始化同步集合与服务
    let state = EdgeState::initialize(&config)?;

    // 3. 楼面变化时输出概览与厨房队列
    let shutdown = CancellationToken::new();
    let mut tables_rx = state.floor.store().subscribe();
    let monitor_token = shutdown.clone();
    let monitor = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = monitor_token.cancelled() => break,
                changed = tables_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            let tables = tables_rx.borrow_and_update().clone();
            let summary = FloorSummary::from_tables(&tables);
            tracing::info!(
                occupied = summary.occupied_tables,
                guests = summary.total_guests,
                open = %summary.open_revenue,
                daily = %summary.daily_revenue,
                "Floor updated"
            );
            for entry in kitchen_queue(&tables, chrono::Utc::now()) {
                match entry.urgency {
                    Urgency::Normal => tracing::debug!(table = %entry.table_name, minutes = entry.elapsed_minutes, "Kitchen order waiting"),
                    Urgency::Warning | Urgency::Late => tracing::warn!(
                        table = %entry.table_name,
                        minutes = entry.elapsed_minutes,
                        urgency = ?entry.urgency,
                        "Kitchen order delayed"
                    ),
                }
            }
        }
    });

    let ready = state.clone();
    tokio::spawn(async move {
        ready.wait_ready().await;
        tracing::info!("Collections synchronized");
    });

    // 4. Ctrl-C: 停止监听, 等待写入完成
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    shutdown.cancel();
    let _ = monitor.await;
    state.shutdown().await;

    Ok(())
}
