use crate::tasks::{TargetRef, TaskInstance};
use crate::world::{
    BodyPart, Creep, ReturnCode, RoomObject, StructureType, World, CREEP_CLAIM_LIFE_TIME,
    CREEP_LIFE_TIME,
};

pub const GET_RENEWED_TASK_NAME: &str = "getRenewed";

/// 到友方 spawn 旁续命；寿命回到 90% 以上时自然失效
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskGetRenewed;

impl TaskGetRenewed {
    fn lifetime(creep: &Creep) -> u32 {
        if creep.has_part(BodyPart::Claim) {
            CREEP_CLAIM_LIFE_TIME
        } else {
            CREEP_LIFE_TIME
        }
    }
}

impl TaskInstance for TaskGetRenewed {
    fn name(&self) -> &'static str {
        GET_RENEWED_TASK_NAME
    }

    /// ticks_to_live < 0.9 * lifetime（整数比较，恰好 90% 时无效）
    fn is_valid_task(&self, creep: &Creep) -> bool {
        let lifetime = u64::from(Self::lifetime(creep));
        creep
            .ticks_to_live
            .is_some_and(|ttl| u64::from(ttl) * 10 < lifetime * 9)
    }

    fn is_valid_target(&self, target: &RoomObject) -> bool {
        matches!(
            target,
            RoomObject::Structure(s)
                if s.structure_type == StructureType::Spawn && s.my && !s.spawning
        )
    }

    fn work(&self, creep: &str, target: Option<&TargetRef>, world: &mut dyn World) -> ReturnCode {
        match target {
            Some(spawn) => world.renew_creep(&spawn.id, creep),
            None => ReturnCode::InvalidTarget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Pos, Store, Structure};

    fn creep_with(body: Vec<BodyPart>, ttl: Option<u32>) -> Creep {
        Creep {
            id: "c".into(),
            name: "claimer".into(),
            pos: Pos::new(0, 0),
            body,
            store: Store::new(0),
            ticks_to_live: ttl,
            spawning: false,
            my: true,
        }
    }

    #[test]
    fn test_standard_lifetime_boundary() {
        let body = vec![BodyPart::Work, BodyPart::Move];
        assert!(TaskGetRenewed.is_valid_task(&creep_with(body.clone(), Some(1349))));
        assert!(!TaskGetRenewed.is_valid_task(&creep_with(body.clone(), Some(1350))));
        assert!(!TaskGetRenewed.is_valid_task(&creep_with(body, Some(1500))));
    }

    #[test]
    fn test_claim_lifetime_boundary() {
        let body = vec![BodyPart::Claim, BodyPart::Move];
        assert!(TaskGetRenewed.is_valid_task(&creep_with(body.clone(), Some(539))));
        assert!(!TaskGetRenewed.is_valid_task(&creep_with(body.clone(), Some(540))));
        // 普通 creep 在 540 时仍需续命
        assert!(TaskGetRenewed.is_valid_task(&creep_with(vec![BodyPart::Move], Some(540))));
    }

    #[test]
    fn test_spawning_creep_has_no_ttl() {
        assert!(!TaskGetRenewed.is_valid_task(&creep_with(vec![BodyPart::Move], None)));
    }

    #[test]
    fn test_target_must_be_idle_friendly_spawn() {
        let spawn = Structure::new("spawn", StructureType::Spawn, Pos::new(1, 1));
        assert!(TaskGetRenewed.is_valid_target(&RoomObject::Structure(spawn.clone())));

        let mut busy = spawn.clone();
        busy.spawning = true;
        assert!(!TaskGetRenewed.is_valid_target(&RoomObject::Structure(busy)));

        let mut hostile = spawn;
        hostile.my = false;
        assert!(!TaskGetRenewed.is_valid_target(&RoomObject::Structure(hostile)));

        let tower = Structure::new("tower", StructureType::Tower, Pos::new(1, 1));
        assert!(!TaskGetRenewed.is_valid_target(&RoomObject::Structure(tower)));
    }
}
