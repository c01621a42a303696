//! 任务工厂：各任务种类的构造入口，统一设置默认选项（one_shot / target_range）

use crate::world::ResourceType;

use super::{
    TargetRef, Task, TaskGetRenewed, TaskKind, TaskOptions, TaskPickup, TaskRecharge,
    TaskTransfer, TaskWithdraw,
};

pub struct Tasks;

impl Tasks {
    /// 捡起地上的资源堆（一次性）
    pub fn pickup(target: impl Into<TargetRef>) -> Task {
        Task::new(
            TaskKind::Pickup(TaskPickup),
            Some(target.into()),
            TaskOptions {
                one_shot: true,
                ..TaskOptions::default()
            },
        )
    }

    /// 到 spawn 旁续命，直到寿命回到阈值以上
    pub fn get_renewed(spawn: impl Into<TargetRef>) -> Task {
        Task::new(
            TaskKind::GetRenewed(TaskGetRenewed),
            Some(spawn.into()),
            TaskOptions::default(),
        )
    }

    /// 向目标转移能量（一次性）
    pub fn transfer(target: impl Into<TargetRef>) -> Task {
        Self::transfer_resource(target, ResourceType::Energy, None)
    }

    pub fn transfer_resource(
        target: impl Into<TargetRef>,
        resource_type: ResourceType,
        amount: Option<u32>,
    ) -> Task {
        Task::new(
            TaskKind::Transfer(TaskTransfer {
                resource_type,
                amount,
            }),
            Some(target.into()),
            TaskOptions {
                one_shot: true,
                ..TaskOptions::default()
            },
        )
    }

    /// 从目标取出能量（一次性）
    pub fn withdraw(target: impl Into<TargetRef>) -> Task {
        Self::withdraw_resource(target, ResourceType::Energy, None)
    }

    pub fn withdraw_resource(
        target: impl Into<TargetRef>,
        resource_type: ResourceType,
        amount: Option<u32>,
    ) -> Task {
        Task::new(
            TaskKind::Withdraw(TaskWithdraw {
                resource_type,
                amount,
            }),
            Some(target.into()),
            TaskOptions {
                one_shot: true,
                ..TaskOptions::default()
            },
        )
    }

    /// 从任意能量源充能（无固定目标，每 tick 重新挑选最近的能量源）
    pub fn recharge(min_energy: u32) -> Task {
        Task::new(
            TaskKind::Recharge(TaskRecharge { min_energy }),
            None,
            TaskOptions::default(),
        )
    }
}
