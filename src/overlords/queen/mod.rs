//! Queen：负责给 hatchery（spawn / extension / tower）补能量的 overlord
//!
//! 每个 colony 一个实例，固定只保有一只 queen（带提前孵化）。
//! 每 tick 对每只 queen 重新走一遍决策阶梯（见 `ladder`），有有效任务就执行一步，否则回待命点。

pub mod ladder;

use tracing::debug;

use crate::config::QueenSection;
use crate::hive_clusters::{Colony, Hatchery};
use crate::logistics::{RequestKind, SupplyRequests};
use crate::memory::Memory;
use crate::world::World;
use crate::zerg::Zerg;

use super::{load_zerg, CreepSetup, Overlord, Setups, SpawnRequest, TickContext};

pub use ladder::{decide, Assignment, BufferState, Decision, HatcheryState, QueenState};

pub struct QueenOverlord<'a> {
    name: String,
    colony: String,
    hatchery: &'a Hatchery,
    setup: CreepSetup,
    settings: QueenSection,
    queens: Vec<Zerg>,
}

impl<'a> QueenOverlord<'a> {
    pub fn new(colony: &'a Colony, memory: &Memory, world: &dyn World, settings: QueenSection) -> Self {
        let name = format!("{}:queen", colony.name);
        let setup = if colony.has_storage && !colony.is_rebuilding {
            Setups::queen_default()
        } else {
            Setups::queen_early()
        };
        let queens = load_zerg(&name, memory, world);
        Self {
            name,
            colony: colony.name.clone(),
            hatchery: &colony.hatchery,
            setup,
            settings,
            queens,
        }
    }

    pub fn setup(&self) -> &CreepSetup {
        &self.setup
    }

    /// 多只 queen 共用待命点时给一点余地，单只则站到精确位置
    fn idle_range(&self) -> u32 {
        if self.queens.len() > 1 {
            self.settings.shared_idle_range
        } else {
            0
        }
    }
}

impl Overlord for QueenOverlord<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, ctx: &mut TickContext<'_>) {
        let prespawn = self.settings.prespawn.lead_time(self.hatchery.spawns.len());
        ctx.spawner.request_agents(SpawnRequest {
            overlord: self.name.clone(),
            colony: self.colony.clone(),
            count: 1,
            setup: self.setup.clone(),
            prespawn,
        });
    }

    fn run(&mut self, ctx: &mut TickContext<'_>) {
        let idle_range = self.idle_range();
        let hatchery = self.hatchery;
        for queen in self.queens.iter_mut() {
            let Some((state, pos)) = ctx
                .world
                .creep(&queen.name)
                .map(|c| (QueenState::from_creep(c), c.pos))
            else {
                continue;
            };
            // 缓冲读数每只 queen 重新观测，前一只的动作立即可见
            let buffers = HatcheryState::observe(hatchery, &*ctx.world);
            let request = hatchery
                .transport_requests
                .prioritized_closest_request(pos, RequestKind::Supply);

            let decision = decide(&state, &buffers, request.as_ref());
            if let Some(d) = &decision {
                debug!("{} {} ({})", queen.name, d.assignment.describe(), d.rule);
            }
            queen.set_task(decision.map(|d| d.assignment.into_task()));

            if queen.has_valid_task(&*ctx.world) {
                queen.run(&mut *ctx.world);
            } else {
                debug!("{} resting at {}", queen.name, hatchery.idle_pos);
                queen.go_to(&mut *ctx.world, hatchery.idle_pos, idle_range);
            }
        }
    }

    fn zerg(&self) -> &[Zerg] {
        &self.queens
    }
}
