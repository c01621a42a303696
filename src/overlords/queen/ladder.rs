//! Queen 决策阶梯
//!
//! 纯函数：输入 queen 与 hatchery 缓冲的当前读数、最紧急的补给请求，输出本 tick 的任务分配。
//! 规则按顺序尝试，第一个给出**有效**分配的规则胜出；全部落空时 queen 去待命点休息。
//!
//! 有效性与任务自身的校验一致：
//! - withdraw：queen 有空位，且源有能量
//! - transfer：queen 带着能量，且目标有空位
//! - recharge：queen 有空位

use crate::hive_clusters::Hatchery;
use crate::logistics::TransportRequest;
use crate::tasks::{TargetRef, Task, Tasks};
use crate::world::{Creep, ObjectId, Resolver, World};

/// queen 的 store 读数
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueenState {
    pub energy: u32,
    /// 含非能量资源的总占用
    pub used: u32,
    pub capacity: u32,
}

impl QueenState {
    pub fn from_creep(creep: &Creep) -> Self {
        Self {
            energy: creep.store.energy(),
            used: creep.store.used(),
            capacity: creep.store.capacity(),
        }
    }

    pub fn free(&self) -> u32 {
        self.capacity.saturating_sub(self.used)
    }
}

/// link / battery 的能量读数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferState {
    pub target: TargetRef,
    pub energy: u32,
    pub free: u32,
}

impl BufferState {
    pub fn observe(id: &ObjectId, world: &dyn World) -> Option<Self> {
        let obj = world.resolve(id)?;
        let store = obj.store()?;
        Some(Self {
            target: TargetRef::from(obj),
            energy: store.energy(),
            free: store.free(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.energy == 0
    }

    pub fn is_full(&self) -> bool {
        self.free == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HatcheryState {
    pub link: Option<BufferState>,
    pub battery: Option<BufferState>,
}

impl HatcheryState {
    pub fn observe(hatchery: &Hatchery, world: &dyn World) -> Self {
        Self {
            link: hatchery.link.as_ref().and_then(|id| BufferState::observe(id, world)),
            battery: hatchery
                .battery
                .as_ref()
                .and_then(|id| BufferState::observe(id, world)),
        }
    }

    fn link_has_energy(&self) -> bool {
        self.link.as_ref().is_some_and(|l| !l.is_empty())
    }

    fn battery_has_energy(&self) -> bool {
        self.battery.as_ref().is_some_and(|b| !b.is_empty())
    }

    /// link 有能量、battery 未满：把 link 的能量倒进 battery
    fn can_balance(&self) -> bool {
        self.link_has_energy() && self.battery.as_ref().is_some_and(|b| !b.is_full())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Assignment {
    Transfer(TargetRef),
    Withdraw(TargetRef),
    Recharge,
}

impl Assignment {
    pub fn into_task(self) -> Task {
        match self {
            Assignment::Transfer(target) => Tasks::transfer(target),
            Assignment::Withdraw(target) => Tasks::withdraw(target),
            Assignment::Recharge => Tasks::recharge(0),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Assignment::Transfer(t) => format!("transferring to {}", t),
            Assignment::Withdraw(t) => format!("withdrawing from {}", t),
            Assignment::Recharge => "recharging".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    /// 胜出的规则名
    pub rule: &'static str,
    pub assignment: Assignment,
}

type Pick = fn(&QueenState, &HatcheryState, Option<&TransportRequest>) -> Option<Assignment>;

struct Rule {
    name: &'static str,
    pick: Pick,
}

const LADDER: &[Rule] = &[
    Rule { name: "supply", pick: supply },
    Rule { name: "recharge_link", pick: recharge_link },
    Rule { name: "recharge_battery", pick: recharge_battery },
    Rule { name: "recharge_any", pick: recharge_any },
    Rule { name: "idle_fill_from_link", pick: idle_fill_from_link },
    Rule { name: "idle_unload_to_battery", pick: idle_unload_to_battery },
    Rule { name: "idle_top_up_from_link", pick: idle_top_up_from_link },
    Rule { name: "idle_top_up_from_battery", pick: idle_top_up_from_battery },
    Rule { name: "idle_top_up_no_link", pick: idle_top_up_no_link },
];

pub fn decide(
    queen: &QueenState,
    hatchery: &HatcheryState,
    request: Option<&TransportRequest>,
) -> Option<Decision> {
    LADDER.iter().find_map(|rule| {
        (rule.pick)(queen, hatchery, request).map(|assignment| Decision {
            rule: rule.name,
            assignment,
        })
    })
}

fn withdraw(queen: &QueenState, source: &BufferState) -> Option<Assignment> {
    (queen.free() > 0 && !source.is_empty()).then(|| Assignment::Withdraw(source.target.clone()))
}

fn transfer(queen: &QueenState, target: &TargetRef, room: u32) -> Option<Assignment> {
    (queen.energy > 0 && room > 0).then(|| Assignment::Transfer(target.clone()))
}

fn recharging(queen: &QueenState, request: Option<&TransportRequest>) -> bool {
    queen.energy == 0 || request.is_none()
}

fn supply(q: &QueenState, _: &HatcheryState, request: Option<&TransportRequest>) -> Option<Assignment> {
    let request = request?;
    transfer(q, &request.target, request.amount)
}

fn recharge_link(q: &QueenState, h: &HatcheryState, r: Option<&TransportRequest>) -> Option<Assignment> {
    if !recharging(q, r) {
        return None;
    }
    withdraw(q, h.link.as_ref().filter(|l| !l.is_empty())?)
}

fn recharge_battery(q: &QueenState, h: &HatcheryState, r: Option<&TransportRequest>) -> Option<Assignment> {
    if !recharging(q, r) || h.link_has_energy() {
        return None;
    }
    withdraw(q, h.battery.as_ref()?)
}

fn recharge_any(q: &QueenState, h: &HatcheryState, r: Option<&TransportRequest>) -> Option<Assignment> {
    if !recharging(q, r) || h.link_has_energy() || h.battery_has_energy() {
        return None;
    }
    (q.free() > 0).then_some(Assignment::Recharge)
}

fn idle_fill_from_link(q: &QueenState, h: &HatcheryState, _: Option<&TransportRequest>) -> Option<Assignment> {
    if !h.can_balance() || q.energy >= q.capacity {
        return None;
    }
    withdraw(q, h.link.as_ref()?)
}

fn idle_unload_to_battery(q: &QueenState, h: &HatcheryState, _: Option<&TransportRequest>) -> Option<Assignment> {
    if !h.can_balance() || q.energy < q.capacity {
        return None;
    }
    let battery = h.battery.as_ref()?;
    transfer(q, &battery.target, battery.free)
}

fn idle_top_up_from_link(q: &QueenState, h: &HatcheryState, _: Option<&TransportRequest>) -> Option<Assignment> {
    if h.can_balance() || q.energy >= q.capacity {
        return None;
    }
    withdraw(q, h.link.as_ref()?)
}

fn idle_top_up_from_battery(q: &QueenState, h: &HatcheryState, _: Option<&TransportRequest>) -> Option<Assignment> {
    if h.link.is_none() || h.can_balance() || h.link_has_energy() || q.energy >= q.capacity {
        return None;
    }
    withdraw(q, h.battery.as_ref()?)
}

fn idle_top_up_no_link(q: &QueenState, h: &HatcheryState, _: Option<&TransportRequest>) -> Option<Assignment> {
    if h.link.is_some() || q.energy >= q.capacity {
        return None;
    }
    withdraw(q, h.battery.as_ref()?)
}
