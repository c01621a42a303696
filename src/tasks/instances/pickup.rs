use crate::tasks::{TargetRef, TaskInstance};
use crate::world::{Creep, ReturnCode, RoomObject, World};

pub const PICKUP_TASK_NAME: &str = "pickup";

/// 捡起地上的资源堆
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskPickup;

impl TaskInstance for TaskPickup {
    fn name(&self) -> &'static str {
        PICKUP_TASK_NAME
    }

    fn is_valid_task(&self, creep: &Creep) -> bool {
        creep.store.used() < creep.store.capacity()
    }

    fn is_valid_target(&self, target: &RoomObject) -> bool {
        matches!(target, RoomObject::Resource(pile) if pile.amount > 0)
    }

    fn work(&self, creep: &str, target: Option<&TargetRef>, world: &mut dyn World) -> ReturnCode {
        match target {
            Some(t) => world.pickup(creep, &t.id),
            None => ReturnCode::InvalidTarget,
        }
    }
}
