//! refresh token 后台清扫任务。
//!
//! 按固定周期批量删除失效（已取消或已过期）的 refresh token 行。
//! 任务与请求处理完全解耦：每次清扫是一条独立提交的删除语句，
//! 不持有跨周期的锁；单次失败只记录日志，下个周期照常执行。

use domain::now_epoch_seconds;
use std::sync::Arc;
use std::time::Duration;
use taskhub_storage::{RefreshTokenStore, StorageError};
use tracing::{info, warn};

/// 执行一次清扫，返回删除的行数（零是正常结果）。
pub async fn sweep_once(store: &dyn RefreshTokenStore) -> Result<u64, StorageError> {
    store.delete_inactive(now_epoch_seconds()).await
}

/// 启动后台清扫任务。
///
/// 第一个 tick 立即触发（启动即清一次），之后每 `interval` 执行一次。
pub fn spawn_sweeper(
    store: Arc<dyn RefreshTokenStore>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            target: "taskhub.sweeper",
            interval_secs = interval.as_secs(),
            "refresh token sweeper started"
        );
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match sweep_once(store.as_ref()).await {
                Ok(deleted) => {
                    info!(target: "taskhub.sweeper", deleted, "refresh token sweep finished");
                }
                Err(err) => {
                    // 临时性存储故障不终止任务
                    warn!(target: "taskhub.sweeper", error = %err, "refresh token sweep failed");
                }
            }
        }
    })
}
