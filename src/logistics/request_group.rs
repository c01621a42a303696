//! 按优先级分桶的请求组

use std::collections::BTreeMap;

use crate::tasks::TargetRef;
use crate::world::{Pos, ResourceType, Structure};

use super::{RequestKind, RequestPriority, SupplyRequests, TransportRequest};

#[derive(Debug, Default)]
pub struct TransportRequestGroup {
    supply: BTreeMap<RequestPriority, Vec<TransportRequest>>,
    withdraw: BTreeMap<RequestPriority, Vec<TransportRequest>>,
}

impl TransportRequestGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记“需要补给”请求；amount 为 0 的请求忽略
    pub fn request_input(
        &mut self,
        target: &Structure,
        resource_type: ResourceType,
        amount: u32,
        priority: RequestPriority,
    ) {
        Self::push(&mut self.supply, target, resource_type, amount, priority);
    }

    /// 登记“需要取走”请求
    pub fn request_output(
        &mut self,
        target: &Structure,
        resource_type: ResourceType,
        amount: u32,
        priority: RequestPriority,
    ) {
        Self::push(&mut self.withdraw, target, resource_type, amount, priority);
    }

    pub fn len(&self, kind: RequestKind) -> usize {
        self.bucket(kind).values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len(RequestKind::Supply) == 0 && self.len(RequestKind::Withdraw) == 0
    }

    fn bucket(&self, kind: RequestKind) -> &BTreeMap<RequestPriority, Vec<TransportRequest>> {
        match kind {
            RequestKind::Supply => &self.supply,
            RequestKind::Withdraw => &self.withdraw,
        }
    }

    fn push(
        bucket: &mut BTreeMap<RequestPriority, Vec<TransportRequest>>,
        target: &Structure,
        resource_type: ResourceType,
        amount: u32,
        priority: RequestPriority,
    ) {
        if amount == 0 {
            return;
        }
        bucket.entry(priority).or_default().push(TransportRequest {
            target: TargetRef::from(target),
            structure_type: target.structure_type,
            resource_type,
            amount,
            priority,
        });
    }
}

impl SupplyRequests for TransportRequestGroup {
    fn prioritized_closest_request(&self, pos: Pos, kind: RequestKind) -> Option<TransportRequest> {
        // BTreeMap 按优先级升序，第一个非空桶即最高优先级
        self.bucket(kind)
            .values()
            .find(|requests| !requests.is_empty())?
            .iter()
            .min_by_key(|r| r.pos().range_to(pos))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Store, StructureType};

    fn ext(id: &str, x: i32) -> Structure {
        Structure::new(id, StructureType::Extension, Pos::new(x, 10))
            .with_store(Store::with_energy(50, 0))
    }

    #[test]
    fn test_highest_priority_wins_over_distance() {
        let mut group = TransportRequestGroup::new();
        group.request_input(&ext("near", 11), ResourceType::Energy, 50, RequestPriority::Normal);
        group.request_input(&ext("far", 40), ResourceType::Energy, 50, RequestPriority::High);

        let request = group
            .prioritized_closest_request(Pos::new(10, 10), RequestKind::Supply)
            .unwrap();
        assert_eq!(request.target.id.as_str(), "far");
    }

    #[test]
    fn test_closest_within_priority() {
        let mut group = TransportRequestGroup::new();
        group.request_input(&ext("a", 30), ResourceType::Energy, 50, RequestPriority::High);
        group.request_input(&ext("b", 12), ResourceType::Energy, 50, RequestPriority::High);

        let request = group
            .prioritized_closest_request(Pos::new(10, 10), RequestKind::Supply)
            .unwrap();
        assert_eq!(request.target.id.as_str(), "b");
        assert_eq!(request.structure_type, StructureType::Extension);
    }

    #[test]
    fn test_kinds_are_separate_and_zero_amount_ignored() {
        let mut group = TransportRequestGroup::new();
        group.request_output(&ext("full", 12), ResourceType::Energy, 50, RequestPriority::Low);
        group.request_input(&ext("done", 12), ResourceType::Energy, 0, RequestPriority::High);

        assert!(group
            .prioritized_closest_request(Pos::new(10, 10), RequestKind::Supply)
            .is_none());
        assert_eq!(group.len(RequestKind::Withdraw), 1);
        assert!(!group.is_empty());

        let request = group
            .prioritized_closest_request(Pos::new(10, 10), RequestKind::Withdraw)
            .unwrap();
        assert_eq!(request.target.id.as_str(), "full");
        assert_eq!(request.priority, RequestPriority::Low);
    }

    #[test]
    fn test_same_request_can_be_claimed_twice() {
        let mut group = TransportRequestGroup::new();
        group.request_input(&ext("a", 12), ResourceType::Energy, 50, RequestPriority::High);
        let first = group.prioritized_closest_request(Pos::new(10, 10), RequestKind::Supply);
        let second = group.prioritized_closest_request(Pos::new(20, 10), RequestKind::Supply);
        assert_eq!(first, second);
    }
}
