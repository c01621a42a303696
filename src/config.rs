//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `HIVE__*` 覆盖（双下划线表示嵌套，如 `HIVE__QUEEN__SHARED_IDLE_RANGE=2`）。

use std::path::PathBuf;

use serde::Deserialize;

use crate::overlords::DEFAULT_PRESPAWN;
use crate::world::Pos;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub queen: QueenSection,
    pub sim: SimSection,
    pub colonies: Vec<ColonySection>,
}

/// [app] 段：应用名、memory 文件、tick 节奏
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: Option<String>,
    /// 跨 tick 持久化的 memory 文件
    pub memory_path: PathBuf,
    pub tick_interval_ms: u64,
    /// 运行多少 tick 后退出；未设置时一直运行到收到停止信号
    pub max_ticks: Option<u64>,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            memory_path: PathBuf::from("workspace/memory.json"),
            tick_interval_ms: 100,
            max_ticks: Some(300),
        }
    }
}

/// [queen] 段
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueenSection {
    /// tower 能量低于此值时登记补给请求
    pub refill_towers_below: u32,
    /// 多个 queen 共享待命点时的到达距离
    pub shared_idle_range: u32,
    pub prespawn: PrespawnPolicy,
}

impl Default for QueenSection {
    fn default() -> Self {
        Self {
            refill_towers_below: 500,
            shared_idle_range: 1,
            prespawn: PrespawnPolicy::default(),
        }
    }
}

/// [queen.prespawn] 段：接班者提前孵化的 tick 数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrespawnPolicy {
    /// spawn 数量不超过此值时视为“spawn 很少”
    pub spawn_threshold: usize,
    pub few_spawns: u32,
    pub default: u32,
}

impl Default for PrespawnPolicy {
    fn default() -> Self {
        Self {
            spawn_threshold: 1,
            few_spawns: 100,
            default: DEFAULT_PRESPAWN,
        }
    }
}

impl PrespawnPolicy {
    pub fn lead_time(&self, spawns: usize) -> u32 {
        if spawns <= self.spawn_threshold {
            self.few_spawns
        } else {
            self.default
        }
    }
}

/// [sim] 段：demo 模拟世界参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimSection {
    /// 每 tick 流入 hatchery link 的能量
    pub link_inflow: u32,
    pub extensions: usize,
}

impl Default for SimSection {
    fn default() -> Self {
        Self {
            link_inflow: 20,
            extensions: 5,
        }
    }
}

/// [[colonies]]：殖民地名与 hatchery 锚点
#[derive(Debug, Clone, Deserialize)]
pub struct ColonySection {
    pub name: String,
    pub anchor: Pos,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSection::default(),
            queen: QueenSection::default(),
            sim: SimSection::default(),
            colonies: vec![ColonySection {
                name: "W1N1".to_string(),
                anchor: Pos::new(25, 25),
            }],
        }
    }
}

/// 从 config 目录加载配置，环境变量 HIVE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 HIVE__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("HIVE")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
