//! 任务框架：可序列化、可跨 tick 续跑的工作单元
//!
//! 一个 Task = 任务种类（封闭集合，枚举分发）+ 目标引用（只存 ID 与最后已知坐标）+ 选项 + 可选父任务。
//! 每个 tick 先做两段式校验（is_valid_task / is_valid_target），通过后只执行一步：
//! 在 target_range 内调用 work()，否则朝目标移动一格。

pub mod factory;
pub mod instances;
pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::world::{Creep, ObjectId, Pos, ReturnCode, RoomObject, Structure, World};

pub use factory::Tasks;
pub use instances::{
    TaskGetRenewed, TaskPickup, TaskRecharge, TaskTransfer, TaskWithdraw, GET_RENEWED_TASK_NAME,
    PICKUP_TASK_NAME, RECHARGE_TASK_NAME, TRANSFER_TASK_NAME, WITHDRAW_TASK_NAME,
};
pub use memory::{TaskData, TaskMemory};

/// 目标引用：非拥有，只记录兴趣；每个 tick 通过 Resolver 重新解析
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub id: ObjectId,
    /// 最后一次解析到的位置，目标暂时不可见时用于移动
    pub pos: Pos,
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.pos)
    }
}

impl From<&RoomObject> for TargetRef {
    fn from(obj: &RoomObject) -> Self {
        Self {
            id: obj.id().clone(),
            pos: obj.pos(),
        }
    }
}

impl From<&Structure> for TargetRef {
    fn from(s: &Structure) -> Self {
        Self {
            id: s.id.clone(),
            pos: s.pos,
        }
    }
}

/// 任务选项
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskOptions {
    /// 成功 work() 一次后无条件结束
    pub one_shot: bool,
    /// 距目标多远时可以 work()
    pub target_range: u32,
    /// 创建后多少 tick 失效
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            one_shot: false,
            target_range: 1,
            timeout: None,
        }
    }
}

/// 所有任务种类共享的能力集合
pub trait TaskInstance {
    /// 持久化时写入的任务名（与重建路径一一对应）
    fn name(&self) -> &'static str;

    /// 与目标无关的前置条件
    fn is_valid_task(&self, creep: &Creep) -> bool;

    /// 与目标相关的前置条件；目标解析失败时不会被调用
    fn is_valid_target(&self, target: &RoomObject) -> bool;

    /// 对目标执行一次原子动作
    fn work(&self, creep: &str, target: Option<&TargetRef>, world: &mut dyn World) -> ReturnCode;

    /// 需要持久化的任务私有参数
    fn data(&self) -> TaskData {
        TaskData::default()
    }
}

/// 任务种类（封闭集合）
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskKind {
    Pickup(TaskPickup),
    GetRenewed(TaskGetRenewed),
    Transfer(TaskTransfer),
    Withdraw(TaskWithdraw),
    Recharge(TaskRecharge),
}

impl TaskKind {
    pub fn instance(&self) -> &dyn TaskInstance {
        match self {
            TaskKind::Pickup(t) => t,
            TaskKind::GetRenewed(t) => t,
            TaskKind::Transfer(t) => t,
            TaskKind::Withdraw(t) => t,
            TaskKind::Recharge(t) => t,
        }
    }
}

/// 单步执行的结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// 调用了 work()
    Worked(ReturnCode),
    /// 不在范围内，朝目标移动
    Moved(ReturnCode),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub kind: TaskKind,
    pub target: Option<TargetRef>,
    pub options: TaskOptions,
    /// 创建时的 tick（用于 timeout）
    pub tick: u64,
    pub parent: Option<Box<Task>>,
}

impl Task {
    pub fn new(kind: TaskKind, target: Option<TargetRef>, options: TaskOptions) -> Self {
        Self {
            kind,
            target,
            options,
            tick: 0,
            parent: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.instance().name()
    }

    /// 设置超时：从 created 起 ticks 个 tick 后失效
    pub fn with_timeout(mut self, created: u64, ticks: u64) -> Self {
        self.tick = created;
        self.options.timeout = Some(ticks);
        self
    }

    /// 以当前任务为父任务，返回新的子任务（完成后回到当前任务）
    pub fn fork(self, mut child: Task) -> Task {
        child.parent = Some(Box::new(self));
        child
    }

    /// 父任务链长度（不含自身）
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent.as_deref();
        while let Some(parent) = cursor {
            depth += 1;
            cursor = parent.parent.as_deref();
        }
        depth
    }

    pub fn is_valid_task(&self, creep: &Creep) -> bool {
        self.kind.instance().is_valid_task(creep)
    }

    /// 目标解析失败直接返回 false；无目标任务（recharge）总是通过
    pub fn is_valid_target(&self, target: Option<&RoomObject>) -> bool {
        match (&self.target, target) {
            (None, _) => true,
            (Some(_), Some(obj)) => self.kind.instance().is_valid_target(obj),
            (Some(_), None) => false,
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.options
            .timeout
            .is_some_and(|ticks| now >= self.tick.saturating_add(ticks))
    }

    pub fn is_valid(&self, creep: &Creep, target: Option<&RoomObject>, now: u64) -> bool {
        !self.is_expired(now) && self.is_valid_task(creep) && self.is_valid_target(target)
    }

    /// 执行一步；调用方保证本 tick 已通过校验
    pub fn step(&self, creep: &str, creep_pos: Pos, world: &mut dyn World) -> Step {
        let instance = self.kind.instance();
        match &self.target {
            None => Step::Worked(instance.work(creep, None, world)),
            Some(target) if creep_pos.in_range_to(target.pos, self.options.target_range) => {
                Step::Worked(instance.work(creep, Some(target), world))
            }
            Some(target) => {
                Step::Moved(world.move_to(creep, target.pos, self.options.target_range))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{BodyPart, ResourcePile, ResourceType, Store};

    fn creep(energy: u32) -> Creep {
        Creep {
            id: "c".into(),
            name: "worker".into(),
            pos: Pos::new(0, 0),
            body: vec![BodyPart::Carry, BodyPart::Move],
            store: Store::with_energy(50, energy),
            ticks_to_live: Some(1000),
            spawning: false,
            my: true,
        }
    }

    fn pile(amount: u32) -> RoomObject {
        RoomObject::Resource(ResourcePile {
            id: "pile".into(),
            pos: Pos::new(1, 1),
            resource_type: ResourceType::Energy,
            amount,
        })
    }

    #[test]
    fn test_unresolved_target_is_invalid() {
        let task = Tasks::pickup(&pile(10));
        assert!(!task.is_valid_target(None));
        assert!(!task.is_valid(&creep(0), None, 0));
    }

    #[test]
    fn test_targetless_task_accepts_missing_target() {
        let task = Tasks::recharge(0);
        assert!(task.is_valid_target(None));
    }

    #[test]
    fn test_timeout_expires_task() {
        let task = Tasks::pickup(&pile(10)).with_timeout(100, 5);
        let target = pile(10);
        assert!(task.is_valid(&creep(0), Some(&target), 104));
        assert!(!task.is_valid(&creep(0), Some(&target), 105));
    }

    #[test]
    fn test_fork_keeps_parent_chain() {
        let target = pile(10);
        let outer = Tasks::recharge(0);
        let chained = outer.clone().fork(Tasks::pickup(&target));
        assert_eq!(chained.name(), PICKUP_TASK_NAME);
        assert_eq!(chained.depth(), 1);
        assert_eq!(chained.parent.as_deref(), Some(&outer));
    }
}
