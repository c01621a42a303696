//! 内存模拟世界（用于测试与 demo，无需真实游戏服务器）
//!
//! 规则只模拟任务层关心的部分：距离检查、store 搬运、单格移动、寿命衰减、link 进账。
//! 每个 creep 每 tick 只允许一次动作，第二次调用返回 Busy。

use std::collections::{BTreeMap, HashMap, HashSet};

use super::{
    BodyPart, Creep, ObjectId, Pos, Resolver, ResourcePile, ResourceType, ReturnCode, RoomObject,
    Store, Structure, StructureType, World, CREEP_CLAIM_LIFE_TIME, CREEP_LIFE_TIME,
};

/// 续命一次消耗的 spawn 能量
const RENEW_ENERGY_COST: u32 = 10;
/// 续命一次增加的寿命基数（按身体部件数均摊）
const RENEW_TICKS_BASE: u32 = 600;

/// 动作记录（测试里用来断言“每 tick 一次动作”）
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Transfer { creep: String, target: ObjectId },
    Withdraw { creep: String, target: ObjectId },
    Pickup { creep: String, target: ObjectId },
    Renew { creep: String, spawn: ObjectId },
    Move { creep: String, to: Pos },
}

impl Action {
    pub fn creep(&self) -> &str {
        match self {
            Action::Transfer { creep, .. }
            | Action::Withdraw { creep, .. }
            | Action::Pickup { creep, .. }
            | Action::Renew { creep, .. }
            | Action::Move { creep, .. } => creep,
        }
    }
}

#[derive(Debug, Default)]
pub struct SimWorld {
    time: u64,
    objects: BTreeMap<ObjectId, RoomObject>,
    creep_ids: HashMap<String, ObjectId>,
    acted: HashSet<String>,
    actions: Vec<Action>,
    /// 每 tick 流入每个 link 的能量（模拟远端 link 发送）
    link_inflow: u32,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link_inflow(mut self, per_tick: u32) -> Self {
        self.link_inflow = per_tick;
        self
    }

    pub fn add_structure(&mut self, structure: Structure) -> ObjectId {
        let id = structure.id.clone();
        self.objects.insert(id.clone(), RoomObject::Structure(structure));
        id
    }

    pub fn add_resource(&mut self, pile: ResourcePile) -> ObjectId {
        let id = pile.id.clone();
        self.objects.insert(id.clone(), RoomObject::Resource(pile));
        id
    }

    pub fn add_creep(&mut self, creep: Creep) -> ObjectId {
        let id = creep.id.clone();
        self.creep_ids.insert(creep.name.clone(), id.clone());
        self.objects.insert(id.clone(), RoomObject::Creep(creep));
        id
    }

    /// 孵化一个新 creep：容量由 CARRY 部件数决定，寿命按是否带 CLAIM 决定
    pub fn spawn_creep(&mut self, name: &str, body: Vec<BodyPart>, pos: Pos) -> ObjectId {
        let carry = body.iter().filter(|p| **p == BodyPart::Carry).count() as u32;
        let lifetime = if body.contains(&BodyPart::Claim) {
            CREEP_CLAIM_LIFE_TIME
        } else {
            CREEP_LIFE_TIME
        };
        let creep = Creep {
            id: ObjectId::new(uuid::Uuid::new_v4().simple().to_string()),
            name: name.to_string(),
            pos,
            body,
            store: Store::new(carry * BodyPart::CARRY_CAPACITY),
            ticks_to_live: Some(lifetime),
            spawning: true,
            my: true,
        };
        self.add_creep(creep)
    }

    pub fn remove(&mut self, id: &ObjectId) -> Option<RoomObject> {
        let removed = self.objects.remove(id);
        if let Some(RoomObject::Creep(c)) = &removed {
            self.creep_ids.remove(&c.name);
        }
        removed
    }

    pub fn structure(&self, id: &ObjectId) -> Option<&Structure> {
        self.objects.get(id).and_then(RoomObject::as_structure)
    }

    pub fn structure_mut(&mut self, id: &ObjectId) -> Option<&mut Structure> {
        match self.objects.get_mut(id) {
            Some(RoomObject::Structure(s)) => Some(s),
            _ => None,
        }
    }

    pub fn creep_mut(&mut self, name: &str) -> Option<&mut Creep> {
        let id = self.creep_ids.get(name)?;
        match self.objects.get_mut(id) {
            Some(RoomObject::Creep(c)) => Some(c),
            _ => None,
        }
    }

    /// 本 tick 内已发生的动作
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn structures(&self) -> impl Iterator<Item = &Structure> {
        self.objects.values().filter_map(RoomObject::as_structure)
    }

    /// 推进到下一 tick：寿命衰减、死亡清理、spawning 结束、link 进账
    pub fn advance(&mut self) {
        self.time += 1;
        self.acted.clear();
        self.actions.clear();

        let mut dead = Vec::new();
        for obj in self.objects.values_mut() {
            match obj {
                RoomObject::Creep(c) => {
                    if c.spawning {
                        c.spawning = false;
                        continue;
                    }
                    if let Some(ttl) = c.ticks_to_live.as_mut() {
                        *ttl = ttl.saturating_sub(1);
                        if *ttl == 0 {
                            dead.push(c.id.clone());
                        }
                    }
                }
                RoomObject::Structure(s) if s.structure_type == StructureType::Link => {
                    if let Some(store) = s.store.as_mut() {
                        store.add(ResourceType::Energy, self.link_inflow);
                    }
                }
                RoomObject::Structure(s) => s.spawning = false,
                RoomObject::Resource(_) => {}
            }
        }
        for id in dead {
            tracing::debug!("creep {} expired", id);
            self.remove(&id);
        }
    }

    fn store_mut(&mut self, id: &ObjectId) -> Option<&mut Store> {
        match self.objects.get_mut(id)? {
            RoomObject::Structure(s) => s.store.as_mut(),
            RoomObject::Creep(c) => Some(&mut c.store),
            RoomObject::Resource(_) => None,
        }
    }

    /// 动作前置检查：creep 存在、可控、本 tick 尚未行动
    fn ready_creep(&self, name: &str) -> Result<&Creep, ReturnCode> {
        let creep = self.creep(name).ok_or(ReturnCode::NotFound)?;
        if !creep.my {
            return Err(ReturnCode::NotOwner);
        }
        if creep.spawning || self.acted.contains(name) {
            return Err(ReturnCode::Busy);
        }
        Ok(creep)
    }

    fn record(&mut self, action: Action) {
        self.acted.insert(action.creep().to_string());
        self.actions.push(action);
    }
}

impl Resolver for SimWorld {
    fn resolve(&self, id: &ObjectId) -> Option<&RoomObject> {
        self.objects.get(id)
    }
}

impl World for SimWorld {
    fn time(&self) -> u64 {
        self.time
    }

    fn creep(&self, name: &str) -> Option<&Creep> {
        let id = self.creep_ids.get(name)?;
        match self.objects.get(id) {
            Some(RoomObject::Creep(c)) => Some(c),
            _ => None,
        }
    }

    fn objects(&self) -> Box<dyn Iterator<Item = &RoomObject> + '_> {
        Box::new(self.objects.values())
    }

    fn transfer(
        &mut self,
        creep: &str,
        target: &ObjectId,
        resource: ResourceType,
        amount: Option<u32>,
    ) -> ReturnCode {
        let (creep_id, moved) = {
            let c = match self.ready_creep(creep) {
                Ok(c) => c,
                Err(code) => return code,
            };
            let Some(obj) = self.objects.get(target) else {
                return ReturnCode::InvalidTarget;
            };
            let Some(store) = obj.store() else {
                return ReturnCode::InvalidTarget;
            };
            if !c.pos.in_range_to(obj.pos(), 1) {
                return ReturnCode::NotInRange;
            }
            let held = c.store.get(resource);
            let wanted = amount.unwrap_or(held);
            if held == 0 || wanted > held {
                return ReturnCode::NotEnoughResources;
            }
            if store.free() == 0 || amount.is_some_and(|a| a > store.free()) {
                return ReturnCode::Full;
            }
            (c.id.clone(), wanted.min(store.free()))
        };

        if let Some(s) = self.store_mut(&creep_id) {
            s.remove(resource, moved);
        }
        if let Some(s) = self.store_mut(target) {
            s.add(resource, moved);
        }
        self.record(Action::Transfer {
            creep: creep.to_string(),
            target: target.clone(),
        });
        ReturnCode::Ok
    }

    fn withdraw(
        &mut self,
        creep: &str,
        target: &ObjectId,
        resource: ResourceType,
        amount: Option<u32>,
    ) -> ReturnCode {
        let (creep_id, moved) = {
            let c = match self.ready_creep(creep) {
                Ok(c) => c,
                Err(code) => return code,
            };
            let Some(obj) = self.objects.get(target) else {
                return ReturnCode::InvalidTarget;
            };
            if matches!(obj, RoomObject::Creep(_)) {
                return ReturnCode::InvalidTarget;
            }
            let Some(store) = obj.store() else {
                return ReturnCode::InvalidTarget;
            };
            if !c.pos.in_range_to(obj.pos(), 1) {
                return ReturnCode::NotInRange;
            }
            let held = store.get(resource);
            let free = c.store.free();
            if free == 0 {
                return ReturnCode::Full;
            }
            let wanted = amount.unwrap_or_else(|| held.min(free));
            if held == 0 || wanted > held {
                return ReturnCode::NotEnoughResources;
            }
            if wanted > free {
                return ReturnCode::Full;
            }
            (c.id.clone(), wanted)
        };

        if let Some(s) = self.store_mut(target) {
            s.remove(resource, moved);
        }
        if let Some(s) = self.store_mut(&creep_id) {
            s.add(resource, moved);
        }
        self.record(Action::Withdraw {
            creep: creep.to_string(),
            target: target.clone(),
        });
        ReturnCode::Ok
    }

    fn pickup(&mut self, creep: &str, target: &ObjectId) -> ReturnCode {
        let (creep_id, resource, moved, remaining) = {
            let c = match self.ready_creep(creep) {
                Ok(c) => c,
                Err(code) => return code,
            };
            let Some(RoomObject::Resource(pile)) = self.objects.get(target) else {
                return ReturnCode::InvalidTarget;
            };
            if !c.pos.in_range_to(pile.pos, 1) {
                return ReturnCode::NotInRange;
            }
            let free = c.store.free();
            if free == 0 {
                return ReturnCode::Full;
            }
            let moved = free.min(pile.amount);
            (c.id.clone(), pile.resource_type, moved, pile.amount - moved)
        };

        if let Some(s) = self.store_mut(&creep_id) {
            s.add(resource, moved);
        }
        if remaining == 0 {
            self.objects.remove(target);
        } else if let Some(RoomObject::Resource(pile)) = self.objects.get_mut(target) {
            pile.amount = remaining;
        }
        self.record(Action::Pickup {
            creep: creep.to_string(),
            target: target.clone(),
        });
        ReturnCode::Ok
    }

    fn renew_creep(&mut self, spawn: &ObjectId, creep: &str) -> ReturnCode {
        let gain = {
            let c = match self.ready_creep(creep) {
                Ok(c) => c,
                Err(code) => return code,
            };
            let Some(s) = self.structure(spawn) else {
                return ReturnCode::InvalidTarget;
            };
            if s.structure_type != StructureType::Spawn {
                return ReturnCode::InvalidTarget;
            }
            if !s.my {
                return ReturnCode::NotOwner;
            }
            if s.spawning {
                return ReturnCode::Busy;
            }
            if !c.pos.in_range_to(s.pos, 1) {
                return ReturnCode::NotInRange;
            }
            if s.energy() < RENEW_ENERGY_COST {
                return ReturnCode::NotEnoughResources;
            }
            let lifetime = if c.has_part(BodyPart::Claim) {
                CREEP_CLAIM_LIFE_TIME
            } else {
                CREEP_LIFE_TIME
            };
            let ttl = c.ticks_to_live.unwrap_or(lifetime);
            if ttl >= lifetime {
                return ReturnCode::Full;
            }
            let per_renew = RENEW_TICKS_BASE / (c.body.len().max(1) as u32);
            (ttl + per_renew).min(lifetime)
        };

        if let Some(store) = self.structure_mut(spawn).and_then(|s| s.store.as_mut()) {
            store.remove(ResourceType::Energy, RENEW_ENERGY_COST);
        }
        if let Some(c) = self.creep_mut(creep) {
            c.ticks_to_live = Some(gain);
        }
        self.record(Action::Renew {
            creep: creep.to_string(),
            spawn: spawn.clone(),
        });
        ReturnCode::Ok
    }

    fn move_to(&mut self, creep: &str, pos: Pos, range: u32) -> ReturnCode {
        let next = {
            let c = match self.ready_creep(creep) {
                Ok(c) => c,
                Err(code) => return code,
            };
            if c.pos.in_range_to(pos, range) {
                return ReturnCode::Ok;
            }
            c.pos.step_toward(pos)
        };
        if let Some(c) = self.creep_mut(creep) {
            c.pos = next;
        }
        self.record(Action::Move {
            creep: creep.to_string(),
            to: next,
        });
        ReturnCode::Ok
    }
}
