//! 物流请求：需要补给 / 需要清空的建筑
//!
//! 请求队列的构建与优先级由外部负责，coordinator 只依赖 `SupplyRequests` 的查询契约。
//! `TransportRequestGroup` 是一个简单的内存实现，供 hatchery 与测试使用。

pub mod request_group;

use serde::{Deserialize, Serialize};

use crate::tasks::TargetRef;
use crate::world::{Pos, ResourceType, StructureType};

pub use request_group::TransportRequestGroup;

/// 请求方向
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// 目标需要被填充
    Supply,
    /// 目标需要被取走
    Withdraw,
}

/// 优先级，数值越小越紧急
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RequestPriority {
    Critical = 0,
    High = 1,
    Normal = 2,
    Low = 3,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
    pub target: TargetRef,
    pub structure_type: StructureType,
    pub resource_type: ResourceType,
    /// 仍需搬运的数量
    pub amount: u32,
    pub priority: RequestPriority,
}

impl TransportRequest {
    pub fn pos(&self) -> Pos {
        self.target.pos
    }
}

/// 请求队列查询契约
pub trait SupplyRequests {
    /// 在最高的非空优先级中，返回离 pos 最近的请求
    fn prioritized_closest_request(&self, pos: Pos, kind: RequestKind) -> Option<TransportRequest>;
}
