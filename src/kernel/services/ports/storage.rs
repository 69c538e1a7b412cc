use std::io;

/// 外部键值存储（桌面版为 JSON 文件，浏览器版对应 localStorage）
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;

    fn remove(&mut self, key: &str) -> io::Result<()>;
}
