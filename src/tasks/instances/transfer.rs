use crate::tasks::{TargetRef, TaskData, TaskInstance};
use crate::world::{Creep, ResourceType, ReturnCode, RoomObject, World};

pub const TRANSFER_TASK_NAME: &str = "transfer";

/// 把身上的资源转给目标
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskTransfer {
    pub resource_type: ResourceType,
    /// None 表示能转多少转多少
    pub amount: Option<u32>,
}

impl TaskTransfer {
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

impl TaskInstance for TaskTransfer {
    fn name(&self) -> &'static str {
        TRANSFER_TASK_NAME
    }

    fn is_valid_task(&self, creep: &Creep) -> bool {
        creep.store.get(self.resource_type) >= self.minimum()
    }

    fn is_valid_target(&self, target: &RoomObject) -> bool {
        target
            .store()
            .is_some_and(|store| store.free() >= self.minimum())
    }

    fn work(&self, creep: &str, target: Option<&TargetRef>, world: &mut dyn World) -> ReturnCode {
        match target {
            Some(t) => world.transfer(creep, &t.id, self.resource_type, self.amount),
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
