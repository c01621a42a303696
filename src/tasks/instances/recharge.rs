use std::cmp::Reverse;

use crate::tasks::{TargetRef, TaskData, TaskInstance};
use crate::world::{
    Creep, ObjectId, Pos, ResourceType, ReturnCode, RoomObject, StructureType, World,
};

pub const RECHARGE_TASK_NAME: &str = "recharge";

/// 从任意能量源充能：不绑定目标，每 tick 选择最近的可用能量源
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskRecharge {
    /// 能量源至少要有这么多能量才考虑
    pub min_energy: u32,
}

/// 选中的能量源
struct Source {
    id: ObjectId,
    pos: Pos,
    is_pile: bool,
}

impl TaskRecharge {
    pub(crate) fn from_data(data: &TaskData) -> Self {
        Self {
            min_energy: data.min_energy.unwrap_or(0),
        }
    }

    fn is_rechargeable(obj: &RoomObject) -> bool {
        match obj {
            RoomObject::Resource(pile) => pile.resource_type == ResourceType::Energy,
            RoomObject::Structure(s) => {
                s.my && matches!(
                    s.structure_type,
                    StructureType::Container | StructureType::Storage | StructureType::Link
                )
            }
            RoomObject::Creep(_) => false,
        }
    }

    /// 最近者优先，同距离时能量多者优先
    fn select_source(&self, from: Pos, world: &dyn World) -> Option<Source> {
        let wanted = self.min_energy.max(1);
        world
            .objects()
            .filter(|obj| Self::is_rechargeable(obj) && obj.energy_available() >= wanted)
            .min_by_key(|obj| (obj.pos().range_to(from), Reverse(obj.energy_available())))
            .map(|obj| Source {
                id: obj.id().clone(),
                pos: obj.pos(),
                is_pile: matches!(obj, RoomObject::Resource(_)),
            })
    }
}

impl TaskInstance for TaskRecharge {
    fn name(&self) -> &'static str {
        RECHARGE_TASK_NAME
    }

    fn is_valid_task(&self, creep: &Creep) -> bool {
        creep.store.free() > 0
    }

    fn is_valid_target(&self, _target: &RoomObject) -> bool {
        true
    }

    fn work(&self, creep: &str, _target: Option<&TargetRef>, world: &mut dyn World) -> ReturnCode {
        let Some(pos) = world.creep(creep).map(|c| c.pos) else {
            return ReturnCode::NotFound;
        };
        let Some(source) = self.select_source(pos, world) else {
            tracing::debug!("{} found no energy source to recharge from", creep);
            return ReturnCode::NotFound;
        };
        if !pos.in_range_to(source.pos, 1) {
            return world.move_to(creep, source.pos, 1);
        }
        if source.is_pile {
            world.pickup(creep, &source.id)
        } else {
            world.withdraw(creep, &source.id, ResourceType::Energy, None)
        }
    }

    fn data(&self) -> TaskData {
        TaskData {
            min_energy: Some(self.min_energy),
            ..TaskData::default()
        }
    }
}
