//! 持久化内存：唯一跨 tick 存活的状态
//!
//! 每个 creep 一条记录（角色、所属 overlord、殖民地、当前任务）；进程每 tick 重启，tick 开始读、结束写。

pub mod persistence;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tasks::TaskMemory;
use crate::world::World;

pub use persistence::MemoryStore;

/// 单个 creep 的持久化记录
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreepMemory {
    pub role: String,
    /// 负责该 creep 行为的 overlord（如 "hatchery1:queen"）
    pub overlord: String,
    pub colony: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskMemory>,
}

impl CreepMemory {
    pub fn new(role: impl Into<String>, overlord: impl Into<String>, colony: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            overlord: overlord.into(),
            colony: colony.into(),
            task: None,
        }
    }
}

/// 根记录
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    /// 已完成的 tick 数
    #[serde(default)]
    pub tick: u64,
    #[serde(default)]
    pub creeps: BTreeMap<String, CreepMemory>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 某个 overlord 名下的 creep 名（按名字排序，保证每 tick 迭代顺序稳定）
    pub fn creeps_of(&self, overlord: &str) -> Vec<String> {
        self.creeps
            .iter()
            .filter(|(_, mem)| mem.overlord == overlord)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// 删除已不存在的 creep 记录，返回删除数量
    pub fn clean(&mut self, world: &dyn World) -> usize {
        let before = self.creeps.len();
        self.creeps.retain(|name, _| world.creep(name).is_some());
        let removed = before - self.creeps.len();
        if removed > 0 {
            tracing::debug!("Cleaned memory of {} dead creeps", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{BodyPart, Pos, SimWorld};

    #[test]
    fn test_clean_drops_dead_creeps() {
        let mut world = SimWorld::new();
        world.spawn_creep("alive", vec![BodyPart::Carry, BodyPart::Move], Pos::new(1, 1));

        let mut memory = Memory::new();
        memory
            .creeps
            .insert("alive".into(), CreepMemory::new("queen", "h:queen", "W1N1"));
        memory
            .creeps
            .insert("dead".into(), CreepMemory::new("queen", "h:queen", "W1N1"));

        assert_eq!(memory.clean(&world), 1);
        assert_eq!(memory.creeps_of("h:queen"), vec!["alive".to_string()]);
    }
}
