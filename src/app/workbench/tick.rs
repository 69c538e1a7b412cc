use std::time::Instant;

use super::Workbench;

impl Workbench {
    /// 由主循环定时调用：处理主机事件、自动保存、到期的会话写入
    pub fn tick(&mut self, now: Instant) -> bool {
        let changed = self.process_host_messages();
        self.poll_autosave(now);
        self.gateway.poll(now);
        changed
    }

    /// 定时器每个周期都会触发，文档干净时不做任何事
    fn poll_autosave(&mut self, now: Instant) {
        let interval = self.state().config.autosave_interval();
        if now.saturating_duration_since(self.last_autosave) < interval {
            return;
        }
        self.last_autosave = now;
        if !self.has_unsaved_changes() {
            return;
        }
        tracing::debug!("autosave snapshot");
        self.gateway.save(self.store.snapshot(), now);
    }

    pub fn has_pending_persist(&self) -> bool {
        self.gateway.is_pending()
    }

    /// 立即写入挂起的快照
    pub fn flush(&mut self) -> bool {
        self.gateway.flush()
    }

    /// 退出前写入完整快照
    pub fn shutdown(&mut self) {
        self.gateway.save(self.store.snapshot(), Instant::now());
        self.gateway.flush();
        tracing::info!("workbench shut down");
    }
}
