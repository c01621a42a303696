//! Hive - Screeps 风格的 creep 任务框架
//!
//! 模块划分：
//! - **world**: 世界接口（对象、坐标、动作返回码、ID 解析）与内存模拟世界
//! - **tasks**: 可序列化、可跨 tick 续跑的任务（pickup / getRenewed / transfer / withdraw / recharge）
//! - **zerg**: creep 的任务槽（校验、执行、父任务提升）
//! - **memory**: 跨 tick 的持久化记录与 JSON 文件存储
//! - **logistics**: 补给请求队列
//! - **hive_clusters**: colony 与 hatchery（每 tick 从世界推导）
//! - **overlords**: 按角色协调 creep（queen 决策阶梯、孵化请求）
//! - **core**: 错误类型、tick 内核、优雅关闭
//! - **config**: 应用配置加载（TOML + 环境变量）

pub mod config;
pub mod core;
pub mod hive_clusters;
pub mod logistics;
pub mod memory;
pub mod observability;
pub mod overlords;
pub mod tasks;
pub mod world;
pub mod zerg;

pub use crate::core::{HiveError, Kernel, TickReport};
