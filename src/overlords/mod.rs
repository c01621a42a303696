//! Overlord：按角色、按集群管理一组 creep 的协调者
//!
//! 每 tick 重新构造：init() 发出补员请求，run() 为每个 creep 选择并执行任务。
//! overlord 不管 creep 的生死，只管行为分配；孵化时机由 `SpawnRequests` 的实现方决定。

pub mod queen;
pub mod setups;
pub mod spawn_queue;

use crate::memory::Memory;
use crate::world::World;
use crate::zerg::Zerg;

pub use queen::QueenOverlord;
pub use setups::{CreepSetup, Roles, Setups};
pub use spawn_queue::SpawnQueue;

/// 默认提前孵化的 tick 数
pub const DEFAULT_PRESPAWN: u32 = 40;

/// 补员请求
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnRequest {
    /// 发起请求的 overlord
    pub overlord: String,
    pub colony: String,
    /// 期望同时存活的数量
    pub count: usize,
    pub setup: CreepSetup,
    /// 现有 creep 剩余寿命低于此值时就开始孵化接班者
    pub prespawn: u32,
}

/// 补员协作方：发出即忘
pub trait SpawnRequests {
    fn request_agents(&mut self, request: SpawnRequest);
}

/// 单个 tick 内 overlord 可用的外部服务
pub struct TickContext<'a> {
    pub world: &'a mut dyn World,
    pub spawner: &'a mut dyn SpawnRequests,
}

pub trait Overlord {
    /// 唯一引用名，写入 CreepMemory.overlord
    fn name(&self) -> &str;

    /// 补员
    fn init(&mut self, ctx: &mut TickContext<'_>);

    /// 为每个 creep 分配并执行任务
    fn run(&mut self, ctx: &mut TickContext<'_>);

    /// 本 tick 管理的 creep（tick 结束时写回内存）
    fn zerg(&self) -> &[Zerg];
}

/// 从内存中取出某个 overlord 名下、当前可控制的 creep（孵化中的不算）
pub fn load_zerg(overlord: &str, memory: &Memory, world: &dyn World) -> Vec<Zerg> {
    memory
        .creeps_of(overlord)
        .into_iter()
        .filter(|name| world.creep(name).is_some_and(|c| !c.spawning))
        .filter_map(|name| memory.creeps.get(&name).map(|mem| Zerg::load(name.as_str(), mem)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::CreepMemory;
    use crate::world::{BodyPart, Pos, SimWorld};

    #[test]
    fn test_load_zerg_skips_spawning_and_foreign_creeps() {
        let mut world = SimWorld::new();
        world.spawn_creep("q1", vec![BodyPart::Carry, BodyPart::Move], Pos::new(1, 1));
        world.spawn_creep("q2", vec![BodyPart::Carry, BodyPart::Move], Pos::new(1, 1));
        world.spawn_creep("miner", vec![BodyPart::Work, BodyPart::Move], Pos::new(1, 1));
        world.advance();
        world.spawn_creep("q3", vec![BodyPart::Carry, BodyPart::Move], Pos::new(1, 1));

        let mut memory = Memory::new();
        for name in ["q1", "q2", "q3"] {
            memory
                .creeps
                .insert(name.into(), CreepMemory::new("queen", "W1N1:queen", "W1N1"));
        }
        memory
            .creeps
            .insert("miner".into(), CreepMemory::new("drone", "W1N1:mining", "W1N1"));

        let zerg = load_zerg("W1N1:queen", &memory, &world);
        let names: Vec<&str> = zerg.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["q1", "q2"]);
    }
}
