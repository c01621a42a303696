//! 世界对象：Store、Creep、Structure、ResourcePile 及其统一视图 RoomObject

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ObjectId, Pos};

/// 资源类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Energy,
    Power,
    Hydrogen,
    Oxygen,
}

impl Default for ResourceType {
    fn default() -> Self {
        Self::Energy
    }
}

/// 资源存储：总容量 + 各资源数量
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Store {
    capacity: u32,
    contents: BTreeMap<ResourceType, u32>,
}

impl Store {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            contents: BTreeMap::new(),
        }
    }

    /// 只装能量的 store（大多数建筑）
    pub fn with_energy(capacity: u32, energy: u32) -> Self {
        let mut store = Self::new(capacity);
        store.add(ResourceType::Energy, energy.min(capacity));
        store
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn get(&self, resource: ResourceType) -> u32 {
        self.contents.get(&resource).copied().unwrap_or(0)
    }

    pub fn energy(&self) -> u32 {
        self.get(ResourceType::Energy)
    }

    pub fn used(&self) -> u32 {
        self.contents.values().sum()
    }

    pub fn free(&self) -> u32 {
        self.capacity.saturating_sub(self.used())
    }

    pub fn is_empty(&self) -> bool {
        self.used() == 0
    }

    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// 放入资源，返回实际放入量（受剩余容量限制）
    pub fn add(&mut self, resource: ResourceType, amount: u32) -> u32 {
        let moved = amount.min(self.free());
        if moved > 0 {
            *self.contents.entry(resource).or_insert(0) += moved;
        }
        moved
    }

    /// 取出资源，返回实际取出量
    pub fn remove(&mut self, resource: ResourceType, amount: u32) -> u32 {
        let held = self.get(resource);
        let moved = amount.min(held);
        if moved == held {
            self.contents.remove(&resource);
        } else {
            self.contents.insert(resource, held - moved);
        }
        moved
    }
}

/// 身体部件
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPart {
    Move,
    Work,
    Carry,
    Attack,
    Heal,
    Claim,
    Tough,
}

impl BodyPart {
    /// 每个 CARRY 部件提供的容量
    pub const CARRY_CAPACITY: u32 = 50;

    /// 孵化成本
    pub fn cost(self) -> u32 {
        match self {
            BodyPart::Move | BodyPart::Carry => 50,
            BodyPart::Work => 100,
            BodyPart::Attack => 80,
            BodyPart::Heal => 250,
            BodyPart::Claim => 600,
            BodyPart::Tough => 10,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Creep {
    pub id: ObjectId,
    pub name: String,
    pub pos: Pos,
    pub body: Vec<BodyPart>,
    pub store: Store,
    pub ticks_to_live: Option<u32>,
    pub spawning: bool,
    pub my: bool,
}

impl Creep {
    pub fn has_part(&self, part: BodyPart) -> bool {
        self.body.contains(&part)
    }
}

/// 建筑类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    Spawn,
    Extension,
    Tower,
    Link,
    Container,
    Storage,
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StructureType::Spawn => "spawn",
            StructureType::Extension => "extension",
            StructureType::Tower => "tower",
            StructureType::Link => "link",
            StructureType::Container => "container",
            StructureType::Storage => "storage",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug)]
pub struct Structure {
    pub id: ObjectId,
    pub structure_type: StructureType,
    pub pos: Pos,
    pub my: bool,
    pub store: Option<Store>,
    /// 仅 spawn 有意义：正在孵化时不能续命
    pub spawning: bool,
}

impl Structure {
    pub fn new(id: impl Into<ObjectId>, structure_type: StructureType, pos: Pos) -> Self {
        Self {
            id: id.into(),
            structure_type,
            pos,
            my: true,
            store: None,
            spawning: false,
        }
    }

    pub fn with_store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    pub fn energy(&self) -> u32 {
        self.store.as_ref().map(Store::energy).unwrap_or(0)
    }
}

/// 地上的资源堆
#[derive(Clone, Debug)]
pub struct ResourcePile {
    pub id: ObjectId,
    pub pos: Pos,
    pub resource_type: ResourceType,
    pub amount: u32,
}

/// 可被任务作为目标的对象
#[derive(Clone, Debug)]
pub enum RoomObject {
    Structure(Structure),
    Resource(ResourcePile),
    Creep(Creep),
}

impl RoomObject {
    pub fn id(&self) -> &ObjectId {
        match self {
            RoomObject::Structure(s) => &s.id,
            RoomObject::Resource(r) => &r.id,
            RoomObject::Creep(c) => &c.id,
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            RoomObject::Structure(s) => s.pos,
            RoomObject::Resource(r) => r.pos,
            RoomObject::Creep(c) => c.pos,
        }
    }

    pub fn store(&self) -> Option<&Store> {
        match self {
            RoomObject::Structure(s) => s.store.as_ref(),
            RoomObject::Resource(_) => None,
            RoomObject::Creep(c) => Some(&c.store),
        }
    }

    pub fn as_structure(&self) -> Option<&Structure> {
        match self {
            RoomObject::Structure(s) => Some(s),
            _ => None,
        }
    }

    /// 可提供给 creep 的能量数量
    pub fn energy_available(&self) -> u32 {
        match self {
            RoomObject::Resource(r) if r.resource_type == ResourceType::Energy => r.amount,
            RoomObject::Resource(_) => 0,
            RoomObject::Structure(s) => s.energy(),
            RoomObject::Creep(_) => 0,
        }
    }
}
