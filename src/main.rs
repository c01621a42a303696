//! Hive - 模拟世界里的 tick 循环
//!
//! 入口：初始化日志、加载配置，搭建一个 demo colony，按 tick_interval_ms 节奏推进。
//! 每个 tick 都从磁盘重新读取 memory，结束时写回，模拟“进程每 tick 重置”的运行环境。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use hive::config::{load_config, AppConfig};
use hive::core::{Kernel, ShutdownManager, ShutdownReason};
use hive::memory::MemoryStore;
use hive::overlords::SpawnQueue;
use hive::world::{Pos, SimWorld, Store, Structure, StructureType};
use tracing::{info, warn};

/// demo colony：锚点周围一个 spawn、若干 extension、一个 link 和一个 container
fn demo_world(cfg: &AppConfig) -> SimWorld {
    let mut world = SimWorld::new().with_link_inflow(cfg.sim.link_inflow);
    for colony in &cfg.colonies {
        let Pos { x, y } = colony.anchor;
        let tag = &colony.name;
        world.add_structure(
            Structure::new(format!("{tag}-spawn"), StructureType::Spawn, Pos::new(x, y + 2))
                .with_store(Store::with_energy(300, 300)),
        );
        for i in 0..cfg.sim.extensions {
            world.add_structure(
                Structure::new(
                    format!("{tag}-ext{i}"),
                    StructureType::Extension,
                    Pos::new(x - 2 + i as i32, y - 2),
                )
                .with_store(Store::new(50)),
            );
        }
        world.add_structure(
            Structure::new(format!("{tag}-link"), StructureType::Link, Pos::new(x - 1, y))
                .with_store(Store::new(800)),
        );
        world.add_structure(
            Structure::new(format!("{tag}-battery"), StructureType::Container, Pos::new(x + 1, y))
                .with_store(Store::with_energy(2000, 500)),
        );
    }
    world
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hive::observability::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = match load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Failed to load config ({}), using defaults", e);
            AppConfig::default()
        }
    };
    info!(
        "{} starting with {} colonies",
        cfg.app.name.as_deref().unwrap_or("hive"),
        cfg.colonies.len()
    );

    let store = MemoryStore::new(&cfg.app.memory_path);
    let mut world = demo_world(&cfg);
    let mut spawner = SpawnQueue::new();
    let kernel = Kernel::new(cfg.clone());

    let shutdown = Arc::new(ShutdownManager::new());
    shutdown.install_signal_handlers();
    let mut reasons = shutdown.subscribe();

    let mut interval = tokio::time::interval(Duration::from_millis(cfg.app.tick_interval_ms));
    let mut ticks = 0u64;
    loop {
        tokio::select! {
            _ = shutdown.wait_for_shutdown() => break,
            _ = interval.tick() => {}
        }

        let mut memory = store.load().context("Failed to load memory")?;
        let report = kernel.tick(&mut world, &mut memory, &mut spawner);
        let spawned = spawner.process(&mut world, &mut memory);
        store.save(&memory).context("Failed to save memory")?;
        world.advance();

        if !spawned.is_empty() {
            info!(tick = report.tick, "spawned {}", spawned.join(", "));
        }

        ticks += 1;
        if cfg.app.max_ticks.is_some_and(|max| ticks >= max) {
            shutdown.shutdown(ShutdownReason::TickLimit);
        }
    }

    match reasons.try_recv() {
        Ok(reason) => info!(?reason, "Stopped after {} ticks", ticks),
        Err(_) => info!("Stopped after {} ticks", ticks),
    }
    Ok(())
}
