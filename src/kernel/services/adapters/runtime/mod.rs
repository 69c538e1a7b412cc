mod async_runtime;

pub use async_runtime::AsyncRuntime;
