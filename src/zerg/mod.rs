//! Zerg：creep 的任务槽
//!
//! 每 tick 从 CreepMemory 重建（load），结束时写回（save）。槽内至多一个任务（可带父任务链）。
//! run() 保证每个 creep 每 tick 至多一次改变世界的调用。

use crate::memory::CreepMemory;
use crate::tasks::{Step, Task};
use crate::world::{Pos, Resolver, ReturnCode, World};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zerg {
    pub name: String,
    pub task: Option<Task>,
}

impl Zerg {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            task: None,
        }
    }

    /// 从持久化记录重建；损坏的任务记录直接丢弃，creep 变为空闲
    pub fn load(name: impl Into<String>, memory: &CreepMemory) -> Self {
        let name = name.into();
        let task = match memory.task.clone().map(Task::from_memory) {
            Some(Ok(task)) => Some(task),
            Some(Err(e)) => {
                tracing::warn!("{}: dropping unreadable task record ({})", name, e);
                None
            }
            None => None,
        };
        Self { name, task }
    }

    pub fn save(&self, memory: &mut CreepMemory) {
        memory.task = self.task.as_ref().map(Task::to_memory);
    }

    pub fn set_task(&mut self, task: Option<Task>) {
        self.task = task;
    }

    pub fn task_name(&self) -> Option<&'static str> {
        self.task.as_ref().map(Task::name)
    }

    /// 已分配任务且两段校验（及超时）都通过
    pub fn has_valid_task(&self, world: &dyn World) -> bool {
        let (Some(task), Some(creep)) = (self.task.as_ref(), world.creep(&self.name)) else {
            return false;
        };
        let target = task.target.as_ref().and_then(|t| world.resolve(&t.id));
        task.is_valid(creep, target, world.time())
    }

    pub fn is_idle(&self, world: &dyn World) -> bool {
        !self.has_valid_task(world)
    }

    /// 执行当前任务的一步
    ///
    /// 当前任务失效时静默拆除并提升父任务，直到找到有效任务或槽为空；
    /// 一次性任务 work() 成功后、或 work() 返回终止性错误时，结束并提升父任务。
    /// 返回本 tick 的动作结果（无动作时为 None）。
    pub fn run(&mut self, world: &mut dyn World) -> Option<ReturnCode> {
        let now = world.time();
        let creep_pos = loop {
            let task = self.task.as_mut()?;
            let creep = world.creep(&self.name)?;
            let target = task.target.as_ref().and_then(|t| world.resolve(&t.id));
            if task.is_valid(creep, target, now) {
                let target_pos = target.map(|obj| obj.pos());
                if let (Some(t), Some(pos)) = (task.target.as_mut(), target_pos) {
                    t.pos = pos;
                }
                break creep.pos;
            }
            tracing::trace!("{}: task {} is no longer valid", self.name, task.name());
            self.finish();
        };

        let task = self.task.as_ref()?;
        match task.step(&self.name, creep_pos, world) {
            Step::Worked(code) => {
                if code.is_ok() {
                    if task.options.one_shot {
                        self.finish();
                    }
                } else if code.is_terminal() {
                    // 等待无法恢复：拆除任务，父任务接管
                    tracing::debug!("{}: {} failed with {:?}", self.name, task.name(), code);
                    self.finish();
                } else {
                    tracing::debug!("{}: {} returned {:?}", self.name, task.name(), code);
                }
                Some(code)
            }
            Step::Moved(code) => Some(code),
        }
    }

    /// 结束当前任务，父任务（若有）接管任务槽
    pub fn finish(&mut self) {
        self.task = self.task.take().and_then(|task| task.parent.map(|p| *p));
    }

    /// 无任务时回到待命点
    pub fn go_to(&self, world: &mut dyn World, pos: Pos, range: u32) -> ReturnCode {
        world.move_to(&self.name, pos, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::Tasks;
    use crate::world::sim::Action;
    use crate::world::{
        BodyPart, Creep, ResourcePile, ResourceType, SimWorld, Store, Structure, StructureType,
    };

    fn world_with(energy: u32, pos: Pos) -> SimWorld {
        let mut world = SimWorld::new();
        world.add_creep(Creep {
            id: "q".into(),
            name: "queen".into(),
            pos,
            body: vec![BodyPart::Carry, BodyPart::Move],
            store: Store::with_energy(50, energy),
            ticks_to_live: Some(1000),
            spawning: false,
            my: true,
        });
        world
    }

    fn container(id: &str, pos: Pos, energy: u32) -> Structure {
        Structure::new(id, StructureType::Container, pos).with_store(Store::with_energy(2000, energy))
    }

    #[test]
    fn test_unresolved_target_never_works() {
        let mut world = world_with(0, Pos::new(5, 5));
        let gone = container("gone", Pos::new(5, 6), 100);
        let mut zerg = Zerg::new("queen");
        zerg.set_task(Some(Tasks::withdraw(&gone)));

        assert!(zerg.is_idle(&world));
        assert_eq!(zerg.run(&mut world), None);
        assert!(zerg.task.is_none());
        assert!(world.actions().is_empty());
    }

    #[test]
    fn test_one_shot_cleared_after_success() {
        let mut world = world_with(0, Pos::new(5, 5));
        let battery = world.add_structure(container("battery", Pos::new(5, 6), 1000));
        let mut zerg = Zerg::new("queen");
        zerg.set_task(Some(Tasks::withdraw(world.resolve(&battery).unwrap())));

        assert_eq!(zerg.run(&mut world), Some(ReturnCode::Ok));
        // battery 仍有大量能量，但一次性任务已结束
        assert!(zerg.task.is_none());
        assert_eq!(world.structure(&battery).unwrap().energy(), 950);
    }

    #[test]
    fn test_out_of_range_moves_instead_of_working() {
        let mut world = world_with(0, Pos::new(5, 5));
        let battery = world.add_structure(container("battery", Pos::new(9, 5), 1000));
        let mut zerg = Zerg::new("queen");
        zerg.set_task(Some(Tasks::withdraw(world.resolve(&battery).unwrap())));

        assert_eq!(zerg.run(&mut world), Some(ReturnCode::Ok));
        assert_eq!(zerg.task_name(), Some("withdraw"));
        assert_eq!(
            world.actions(),
            &[Action::Move {
                creep: "queen".into(),
                to: Pos::new(6, 5)
            }]
        );
    }

    #[test]
    fn test_parent_promoted_after_completion() {
        let mut world = world_with(0, Pos::new(5, 5));
        let pile = world.add_resource(ResourcePile {
            id: "drop".into(),
            pos: Pos::new(5, 5),
            resource_type: ResourceType::Energy,
            amount: 10,
        });
        let ext = world.add_structure(
            Structure::new("ext", StructureType::Extension, Pos::new(6, 6))
                .with_store(Store::with_energy(50, 0)),
        );
        let deliver = Tasks::transfer(world.resolve(&ext).unwrap());
        let mut zerg = Zerg::new("queen");
        zerg.set_task(Some(deliver.clone().fork(Tasks::pickup(world.resolve(&pile).unwrap()))));

        assert_eq!(zerg.run(&mut world), Some(ReturnCode::Ok));
        assert_eq!(zerg.task.as_ref(), Some(&deliver));

        world.advance();
        assert_eq!(zerg.run(&mut world), Some(ReturnCode::Ok));
        assert!(zerg.task.is_none());
        assert_eq!(world.structure(&ext).unwrap().energy(), 10);
    }

    #[test]
    fn test_invalid_task_falls_back_to_parent() {
        // creep 已满：withdraw 失效，父任务 transfer 接管并在同一 tick 执行
        let mut world = world_with(50, Pos::new(5, 5));
        let battery = world.add_structure(container("battery", Pos::new(5, 6), 1000));
        let ext = world.add_structure(
            Structure::new("ext", StructureType::Extension, Pos::new(4, 4))
                .with_store(Store::with_energy(50, 0)),
        );
        let task = Tasks::transfer(world.resolve(&ext).unwrap())
            .fork(Tasks::withdraw(world.resolve(&battery).unwrap()));
        let mut zerg = Zerg::new("queen");
        zerg.set_task(Some(task));

        assert_eq!(zerg.run(&mut world), Some(ReturnCode::Ok));
        assert_eq!(world.actions().len(), 1);
        assert_eq!(world.structure(&ext).unwrap().energy(), 50);
    }

    #[test]
    fn test_failed_work_is_not_retried_in_same_tick() {
        let mut world = world_with(0, Pos::new(5, 5));
        let battery = world.add_structure(container("battery", Pos::new(5, 6), 1000));
        let mut zerg = Zerg::new("queen");
        zerg.set_task(Some(Tasks::withdraw(world.resolve(&battery).unwrap())));
        // 本 tick 已经行动过
        assert_eq!(
            world.withdraw("queen", &battery, ResourceType::Energy, Some(10)),
            ReturnCode::Ok
        );

        assert_eq!(zerg.run(&mut world), Some(ReturnCode::Busy));
        assert_eq!(zerg.task_name(), Some("withdraw"));
        assert_eq!(world.actions().len(), 1);
    }

    #[test]
    fn test_terminal_failure_tears_down_task() {
        let mut world = world_with(0, Pos::new(5, 5));
        world.creep_mut("queen").unwrap().ticks_to_live = Some(500);
        let spawn = world.add_structure(
            Structure::new("spawn1", StructureType::Spawn, Pos::new(5, 6))
                .with_store(Store::with_energy(300, 0)),
        );
        let mut zerg = Zerg::new("queen");
        zerg.set_task(Some(Tasks::get_renewed(world.resolve(&spawn).unwrap())));
        assert!(zerg.has_valid_task(&world));

        assert_eq!(zerg.run(&mut world), Some(ReturnCode::NotEnoughResources));
        assert!(zerg.task.is_none());

        // 下一 tick 不再重试
        world.advance();
        assert_eq!(zerg.run(&mut world), None);
        assert!(world.actions().is_empty());
    }

    #[test]
    fn test_terminal_failure_promotes_parent() {
        let mut world = world_with(10, Pos::new(5, 5));
        world.creep_mut("queen").unwrap().ticks_to_live = Some(500);
        let spawn = world.add_structure(
            Structure::new("spawn1", StructureType::Spawn, Pos::new(5, 6))
                .with_store(Store::with_energy(300, 0)),
        );
        let ext = world.add_structure(
            Structure::new("ext", StructureType::Extension, Pos::new(4, 4))
                .with_store(Store::with_energy(50, 0)),
        );
        let deliver = Tasks::transfer(world.resolve(&ext).unwrap());
        let mut zerg = Zerg::new("queen");
        zerg.set_task(Some(
            deliver.clone().fork(Tasks::get_renewed(world.resolve(&spawn).unwrap())),
        ));

        assert_eq!(zerg.run(&mut world), Some(ReturnCode::NotEnoughResources));
        assert_eq!(zerg.task.as_ref(), Some(&deliver));
    }

    #[test]
    fn test_save_and_load_round_trip_through_memory() {
        let world = world_with(0, Pos::new(5, 5));
        let spawn = Structure::new("spawn1", StructureType::Spawn, Pos::new(6, 6));
        let mut zerg = Zerg::new("queen");
        zerg.set_task(Some(Tasks::get_renewed(&spawn).with_timeout(world.time(), 50)));

        let mut memory = CreepMemory::new("queen", "spawn1:queen", "W1N1");
        zerg.save(&mut memory);
        assert_eq!(Zerg::load("queen", &memory), zerg);
    }

    #[test]
    fn test_load_drops_unknown_task() {
        let mut memory = CreepMemory::new("queen", "spawn1:queen", "W1N1");
        memory.task = Some(serde_json::from_str(r#"{"name": "teleport"}"#).unwrap());
        let zerg = Zerg::load("queen", &memory);
        assert!(zerg.task.is_none());
    }
}
