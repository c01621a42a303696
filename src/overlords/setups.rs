//! 角色与身体模板

use crate::world::BodyPart;

pub struct Roles;

impl Roles {
    pub const QUEEN: &'static str = "queen";
}

/// 身体模板：按 pattern 重复，直到能量或 size_limit 用尽
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreepSetup {
    pub role: String,
    pub pattern: Vec<BodyPart>,
    /// pattern 最多重复次数
    pub size_limit: usize,
}

impl CreepSetup {
    pub fn new(role: impl Into<String>, pattern: Vec<BodyPart>, size_limit: usize) -> Self {
        Self {
            role: role.into(),
            pattern,
            size_limit,
        }
    }

    pub fn pattern_cost(&self) -> u32 {
        self.pattern.iter().map(|p| p.cost()).sum()
    }

    /// 在给定能量下生成身体；一个完整 pattern 都负担不起时返回空
    pub fn generate_body(&self, energy: u32) -> Vec<BodyPart> {
        let cost = self.pattern_cost();
        if cost == 0 {
            return Vec::new();
        }
        let repeats = ((energy / cost) as usize).min(self.size_limit);
        self.pattern
            .iter()
            .copied()
            .cycle()
            .take(self.pattern.len() * repeats)
            .collect()
    }
}

pub struct Setups;

impl Setups {
    /// 有 storage 后的 queen
    pub fn queen_default() -> CreepSetup {
        CreepSetup::new(
            Roles::QUEEN,
            vec![BodyPart::Carry, BodyPart::Carry, BodyPart::Move],
            8,
        )
    }

    /// 早期 / 重建阶段的轻量 queen
    pub fn queen_early() -> CreepSetup {
        CreepSetup::new(Roles::QUEEN, vec![BodyPart::Carry, BodyPart::Move], 10)
    }
}
