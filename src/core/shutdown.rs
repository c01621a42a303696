//! 优雅关闭
//!
//! tick 循环在两个 tick 之间检查关闭信号：收到 Ctrl+C / SIGTERM 后，
//! 当前 tick 照常跑完并写回 memory，然后退出循环。

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// 关闭信号管理器
#[derive(Clone)]
pub struct ShutdownManager {
    shutdown_token: CancellationToken,
    reason_tx: broadcast::Sender<ShutdownReason>,
}

/// 关闭原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Ctrl+C
    UserInitiated,
    /// SIGTERM
    Signal,
    /// 达到配置的 max_ticks
    TickLimit,
}

impl ShutdownManager {
    pub fn new() -> Self {
        let (reason_tx, _) = broadcast::channel(1);
        Self {
            shutdown_token: CancellationToken::new(),
            reason_tx,
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// 只广播第一个原因；之后的调用不再发送
    pub fn shutdown(&self, reason: ShutdownReason) {
        if self.shutdown_token.is_cancelled() {
            return;
        }
        let _ = self.reason_tx.send(reason);
        self.shutdown_token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownReason> {
        self.reason_tx.subscribe()
    }

    pub async fn wait_for_shutdown(&self) {
        self.shutdown_token.cancelled().await;
    }

    /// 安装系统信号处理器 (Ctrl+C, SIGTERM)
    pub fn install_signal_handlers(self: &Arc<Self>) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                tracing::info!("Received Ctrl+C, stopping after the current tick...");
                manager.shutdown(ShutdownReason::UserInitiated);
            }
        });

        #[cfg(unix)]
        {
            let manager = Arc::clone(self);
            tokio::spawn(async move {
                use tokio::signal::unix::{signal, SignalKind};
                if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                    sigterm.recv().await;
                    tracing::info!("Received SIGTERM, stopping after the current tick...");
                    manager.shutdown(ShutdownReason::Signal);
                }
            });
        }
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_manager_new() {
        let manager = ShutdownManager::new();
        assert!(!manager.is_shutdown());
    }

    #[test]
    fn test_shutdown_cancels_token_and_broadcasts_reason() {
        let manager = ShutdownManager::new();
        let token = manager.token();
        let mut rx = manager.subscribe();
        manager.shutdown(ShutdownReason::TickLimit);
        assert!(token.is_cancelled());
        assert_eq!(rx.try_recv().unwrap(), ShutdownReason::TickLimit);
    }

    #[test]
    fn test_later_reasons_are_not_broadcast() {
        let manager = ShutdownManager::new();
        let mut rx = manager.subscribe();
        manager.shutdown(ShutdownReason::TickLimit);
        manager.shutdown(ShutdownReason::UserInitiated);
        assert_eq!(rx.try_recv().unwrap(), ShutdownReason::TickLimit);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_returns_after_cancel() {
        let manager = ShutdownManager::new();
        manager.shutdown(ShutdownReason::UserInitiated);
        manager.wait_for_shutdown().await;
        assert!(manager.is_shutdown());
    }
}
