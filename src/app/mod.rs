//! 应用层：组装 kernel 与宿主协作者

pub mod workbench;

pub use workbench::{BindError, Workbench, WorkbenchBuilder};
