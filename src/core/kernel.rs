//! Tick 内核：一次完整的 tick
//!
//! 进程每 tick 都可能被重置，所以这里不保留任何跨 tick 的运行时状态：
//! colony / overlord / zerg 全部从世界与 memory 重新构造，结束时把任务写回 memory。

use tracing::info;

use crate::config::AppConfig;
use crate::hive_clusters::Colony;
use crate::memory::Memory;
use crate::overlords::{Overlord, QueenOverlord, SpawnRequests, TickContext};
use crate::world::World;

/// 单个 tick 的摘要
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub colonies: usize,
    pub agents: usize,
    /// 结束时仍持有任务的 agent 数
    pub busy: usize,
    /// 清理掉的死亡 creep 记录数
    pub cleaned: usize,
}

pub struct Kernel {
    config: AppConfig,
}

impl Kernel {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tick<'a>(
        &self,
        world: &'a mut dyn World,
        memory: &mut Memory,
        spawner: &'a mut dyn SpawnRequests,
    ) -> TickReport {
        let cleaned = memory.clean(&*world);

        let colonies: Vec<Colony> = self
            .config
            .colonies
            .iter()
            .map(|c| {
                Colony::from_world(&c.name, c.anchor, &*world, self.config.queen.refill_towers_below)
            })
            .collect();

        let mut overlords: Vec<Box<dyn Overlord + '_>> = Vec::new();
        for colony in &colonies {
            overlords.push(Box::new(QueenOverlord::new(
                colony,
                memory,
                &*world,
                self.config.queen.clone(),
            )));
        }

        let mut ctx = TickContext { world, spawner };
        for overlord in overlords.iter_mut() {
            overlord.init(&mut ctx);
        }
        for overlord in overlords.iter_mut() {
            overlord.run(&mut ctx);
        }

        let mut report = TickReport {
            tick: memory.tick,
            colonies: colonies.len(),
            cleaned,
            ..TickReport::default()
        };
        for overlord in &overlords {
            for zerg in overlord.zerg() {
                report.agents += 1;
                if zerg.task.is_some() {
                    report.busy += 1;
                }
                if let Some(mem) = memory.creeps.get_mut(&zerg.name) {
                    zerg.save(mem);
                }
            }
        }

        memory.tick += 1;
        info!(
            tick = report.tick,
            agents = report.agents,
            busy = report.busy,
            "tick finished"
        );
        report
    }
}
