//! 世界模型：对象 ID、坐标、存储、身体部件、动作返回码，以及目标解析 / 动作 API 两个协作方 trait
//!
//! 每个 tick 进程都会重建，持久化的只有 `ObjectId` 字符串；活对象句柄只在当前 tick 内通过 `Resolver` 取得。

pub mod objects;
pub mod sim;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use objects::{
    BodyPart, Creep, ResourcePile, ResourceType, RoomObject, Store, Structure, StructureType,
};
pub use sim::SimWorld;

/// 普通 creep 的最大寿命
pub const CREEP_LIFE_TIME: u32 = 1500;
/// 带 CLAIM 部件的 creep 的最大寿命
pub const CREEP_CLAIM_LIFE_TIME: u32 = 600;

/// 世界对象的持久化标识（不透明字符串）
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// 房间内坐标
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 切比雪夫距离（八方向移动）
    pub fn range_to(&self, other: Pos) -> u32 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }

    pub fn in_range_to(&self, other: Pos, range: u32) -> bool {
        self.range_to(other) <= range
    }

    /// 朝 other 方向走一格
    pub fn step_toward(&self, other: Pos) -> Pos {
        Pos {
            x: self.x + (other.x - self.x).signum(),
            y: self.y + (other.y - self.y).signum(),
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 世界动作 API 的返回码
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReturnCode {
    Ok,
    NotOwner,
    Busy,
    NotFound,
    NotEnoughResources,
    InvalidTarget,
    Full,
    NotInRange,
    InvalidArgs,
    Tired,
    NoBodypart,
}

impl ReturnCode {
    pub fn is_ok(self) -> bool {
        matches!(self, ReturnCode::Ok)
    }

    /// 等待无法自行恢复的失败；可恢复的（Busy / Tired / NotInRange）交给下一 tick 再试
    pub fn is_terminal(self) -> bool {
        !matches!(
            self,
            ReturnCode::Ok | ReturnCode::Busy | ReturnCode::Tired | ReturnCode::NotInRange
        )
    }
}

/// 目标解析：把持久化的 ObjectId 映射为本 tick 的活对象，不存在时返回 None
pub trait Resolver {
    fn resolve(&self, id: &ObjectId) -> Option<&RoomObject>;
}

/// 世界模拟 API：查询 + 每个 creep 每 tick 至多一次的动作
pub trait World: Resolver {
    /// 当前 tick
    fn time(&self) -> u64;

    fn creep(&self, name: &str) -> Option<&Creep>;

    /// 所有可见对象（用于 recharge 之类需要扫描能量源的任务）
    fn objects(&self) -> Box<dyn Iterator<Item = &RoomObject> + '_>;

    fn transfer(
        &mut self,
        creep: &str,
        target: &ObjectId,
        resource: ResourceType,
        amount: Option<u32>,
    ) -> ReturnCode;

    fn withdraw(
        &mut self,
        creep: &str,
        target: &ObjectId,
        resource: ResourceType,
        amount: Option<u32>,
    ) -> ReturnCode;

    fn pickup(&mut self, creep: &str, target: &ObjectId) -> ReturnCode;

    /// 由 spawn 为相邻 creep 续命
    fn renew_creep(&mut self, spawn: &ObjectId, creep: &str) -> ReturnCode;

    /// 寻路由外部负责，这里只发出“朝 pos 移动到 range 以内”的意图
    fn move_to(&mut self, creep: &str, pos: Pos, range: u32) -> ReturnCode;
}
