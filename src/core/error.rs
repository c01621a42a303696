//! 框架错误类型
//!
//! tick 内部的失败（目标失效、动作返回非 Ok）不走这里，只记日志；
//! 这里只覆盖基础设施层：任务记录损坏、memory 读写、配置。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HiveError {
    /// 持久化记录里的任务名没有对应的重建路径
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Task {0} has no target")]
    MissingTarget(String),

    #[error("Memory format error: {0}")]
    Memory(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for HiveError {
    fn from(e: config::ConfigError) -> Self {
        HiveError::Config(e.to_string())
    }
}
