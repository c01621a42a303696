//! 殖民地与生产集群
//!
//! 每 tick 从世界重新推导（不缓存），保证共享的能量缓冲状态总是最新读数。

pub mod hatchery;

use crate::world::{Pos, StructureType, World};

pub use hatchery::Hatchery;

/// 属于某个殖民地的建筑距锚点的最大距离（一个房间的半宽）
pub const COLONY_RADIUS: u32 = 24;

/// 殖民地：一个 hatchery 加上全局状态标志
#[derive(Debug)]
pub struct Colony {
    pub name: String,
    /// 是否已有 storage（决定 queen 用成熟模板还是早期模板）
    pub has_storage: bool,
    /// 失去全部 spawn 后处于重建状态
    pub is_rebuilding: bool,
    pub hatchery: Hatchery,
}

impl Colony {
    pub fn from_world(name: &str, anchor: Pos, world: &dyn World, refill_towers_below: u32) -> Self {
        let has_storage = world.objects().any(|obj| {
            obj.as_structure().is_some_and(|s| {
                s.my && s.structure_type == StructureType::Storage
                    && s.pos.in_range_to(anchor, COLONY_RADIUS)
            })
        });
        let hatchery = Hatchery::from_world(&format!("{name}:hatchery"), anchor, world, refill_towers_below);
        let is_rebuilding = hatchery.spawns.is_empty();
        Self {
            name: name.to_string(),
            has_storage,
            is_rebuilding,
            hatchery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{SimWorld, Store, Structure};

    #[test]
    fn test_storage_only_counts_for_its_own_colony() {
        let mut world = SimWorld::new();
        for (name, x) in [("spawn-a", 25), ("spawn-b", 125)] {
            world.add_structure(
                Structure::new(name, StructureType::Spawn, Pos::new(x, 27))
                    .with_store(Store::with_energy(300, 300)),
            );
        }
        world.add_structure(
            Structure::new("storage-a", StructureType::Storage, Pos::new(20, 20))
                .with_store(Store::new(1_000_000)),
        );

        let a = Colony::from_world("W1N1", Pos::new(25, 25), &world, 500);
        let b = Colony::from_world("W2N1", Pos::new(125, 25), &world, 500);
        assert!(a.has_storage);
        assert!(!b.has_storage);
        assert!(!a.is_rebuilding && !b.is_rebuilding);
        assert_eq!(b.hatchery.name, "W2N1:hatchery");
    }
}
