//! mdpad - markdown 编辑器的会话与历史状态核心
//!
//! 模块结构：
//! - core: 语义命令与快捷键
//! - models: 数据模型（DocumentSession, FileCatalog, RecencyStore）
//! - kernel: 无界面的状态机（Store/Action/Effect）、持久化、服务端口与适配器
//! - app: 应用层（Workbench）

pub mod app;
pub mod core;
pub mod kernel;
pub mod models;
