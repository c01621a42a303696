//! Hatchery：spawn / extension / tower 及其能量缓冲（link、battery）
//!
//! 每 tick 重新扫描世界：
//! - spawn、extension 缺能量时登记高优先级补给请求
//! - tower 低于 refill_towers_below 时登记普通优先级请求
//! link 与 battery（container）取锚点 3 格内最近的一个。

use crate::logistics::{RequestPriority, TransportRequestGroup};
use crate::world::{ObjectId, Pos, ResourceType, Structure, StructureType, World};

/// hatchery 相关建筑距锚点的最大距离
const HATCHERY_RADIUS: u32 = 10;
/// link / battery 距锚点的最大距离
const BUFFER_RADIUS: u32 = 3;

#[derive(Debug)]
pub struct Hatchery {
    pub name: String,
    pub pos: Pos,
    /// queen 空闲时的待命点
    pub idle_pos: Pos,
    pub spawns: Vec<Structure>,
    pub extensions: Vec<Structure>,
    pub towers: Vec<Structure>,
    pub link: Option<ObjectId>,
    pub battery: Option<ObjectId>,
    pub transport_requests: TransportRequestGroup,
}

impl Hatchery {
    pub fn from_world(name: &str, anchor: Pos, world: &dyn World, refill_towers_below: u32) -> Self {
        let nearby = |kind: StructureType, radius: u32| -> Vec<Structure> {
            let mut found: Vec<Structure> = world
                .objects()
                .filter_map(|obj| obj.as_structure())
                .filter(|s| s.my && s.structure_type == kind && s.pos.in_range_to(anchor, radius))
                .cloned()
                .collect();
            found.sort_by_key(|s| s.pos.range_to(anchor));
            found
        };

        let mut hatchery = Self {
            name: name.to_string(),
            pos: anchor,
            idle_pos: anchor,
            spawns: nearby(StructureType::Spawn, HATCHERY_RADIUS),
            extensions: nearby(StructureType::Extension, HATCHERY_RADIUS),
            towers: nearby(StructureType::Tower, HATCHERY_RADIUS),
            link: nearby(StructureType::Link, BUFFER_RADIUS)
                .first()
                .map(|s| s.id.clone()),
            battery: nearby(StructureType::Container, BUFFER_RADIUS)
                .first()
                .map(|s| s.id.clone()),
            transport_requests: TransportRequestGroup::new(),
        };
        hatchery.register_energy_requests(refill_towers_below);
        hatchery
    }

    fn register_energy_requests(&mut self, refill_towers_below: u32) {
        for s in self.spawns.iter().chain(self.extensions.iter()) {
            let free = s.store.as_ref().map(|st| st.free()).unwrap_or(0);
            self.transport_requests
                .request_input(s, ResourceType::Energy, free, RequestPriority::High);
        }
        for tower in &self.towers {
            if tower.energy() < refill_towers_below {
                let free = tower.store.as_ref().map(|st| st.free()).unwrap_or(0);
                self.transport_requests
                    .request_input(tower, ResourceType::Energy, free, RequestPriority::Normal);
            }
        }
    }
}
