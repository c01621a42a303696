use crate::tasks::{TargetRef, TaskData, TaskInstance};
use crate::world::{Creep, ResourceType, ReturnCode, RoomObject, World};

pub const WITHDRAW_TASK_NAME: &str = "withdraw";

/// 从建筑里取出资源
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskWithdraw {
    pub resource_type: ResourceType,
    pub amount: Option<u32>,
}

impl TaskWithdraw {
    pub(crate) fn from_data(data: &TaskData) -> Self {
        Self {
            resource_type: data.resource_type.unwrap_or_default(),
            amount: data.amount,
        }
    }

    fn minimum(&self) -> u32 {
        self.amount.unwrap_or(1)
    }
}

impl TaskInstance for TaskWithdraw {
    fn name(&self) -> &'static str {
        WITHDRAW_TASK_NAME
    }

    fn is_valid_task(&self, creep: &Creep) -> bool {
        creep.store.free() >= self.minimum()
    }

    fn is_valid_target(&self, target: &RoomObject) -> bool {
        match target {
            RoomObject::Structure(s) => s
                .store
                .as_ref()
                .is_some_and(|store| store.get(self.resource_type) >= self.minimum()),
            _ => false,
        }
    }

    fn work(&self, creep: &str, target: Option<&TargetRef>, world: &mut dyn World) -> ReturnCode {
        match target {
            Some(t) => world.withdraw(creep, &t.id, self.resource_type, self.amount),
            None => ReturnCode::InvalidTarget,
        }
    }

    fn data(&self) -> TaskData {
        TaskData {
            resource_type: Some(self.resource_type),
            amount: self.amount,
            min_energy: None,
        }
    }
}
