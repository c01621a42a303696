//! 模拟世界里的孵化队列
//!
//! overlord 在 init() 中登记请求；tick 结束后 `process()` 统一处理：
//! 存活数量（排除即将老死的）不足时，用第一个空闲 spawn 孵化，并写入 creep 的 memory。

use tracing::{debug, info};

use crate::memory::{CreepMemory, Memory};
use crate::world::{ResourceType, SimWorld, StructureType, World};

use super::{SpawnRequest, SpawnRequests};

#[derive(Debug, Default)]
pub struct SpawnQueue {
    requests: Vec<SpawnRequest>,
}

impl SpawnRequests for SpawnQueue {
    fn request_agents(&mut self, request: SpawnRequest) {
        self.requests.push(request);
    }
}

impl SpawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[SpawnRequest] {
        &self.requests
    }

    /// 处理并清空本 tick 的请求，返回新孵化的 creep 名
    pub fn process(&mut self, world: &mut SimWorld, memory: &mut Memory) -> Vec<String> {
        let mut spawned = Vec::new();
        for request in self.requests.drain(..) {
            let alive = memory
                .creeps_of(&request.overlord)
                .iter()
                .filter(|name| {
                    world.creep(name).is_some_and(|c| {
                        c.spawning || c.ticks_to_live.map_or(true, |ttl| ttl > request.prespawn)
                    })
                })
                .count();
            if alive >= request.count {
                continue;
            }

            let Some((spawn_id, pos, energy)) = world
                .structures()
                .find(|s| s.my && s.structure_type == StructureType::Spawn && !s.spawning)
                .map(|s| (s.id.clone(), s.pos, s.energy()))
            else {
                debug!("{}: no idle spawn for {}", request.overlord, request.setup.role);
                continue;
            };

            let body = request.setup.generate_body(energy);
            if body.is_empty() {
                debug!(
                    "{}: not enough energy to spawn {} ({})",
                    request.overlord, request.setup.role, energy
                );
                continue;
            }
            let cost: u32 = body.iter().map(|p| p.cost()).sum();

            let uid = uuid::Uuid::new_v4().simple().to_string();
            let name = format!("{}_{}", request.setup.role, &uid[..8]);
            world.spawn_creep(&name, body, pos);
            if let Some(spawn) = world.structure_mut(&spawn_id) {
                spawn.spawning = true;
                if let Some(store) = spawn.store.as_mut() {
                    store.remove(ResourceType::Energy, cost);
                }
            }
            memory.creeps.insert(
                name.clone(),
                CreepMemory::new(&request.setup.role, &request.overlord, &request.colony),
            );
            info!("{} spawning {} for {}", spawn_id, name, request.overlord);
            spawned.push(name);
        }
        spawned
    }
}
