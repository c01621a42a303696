//! 任务持久化记录
//!
//! Task 以嵌套的纯数据记录写入 creep 的 memory：name + 目标 ID + 选项 + 私有参数 + 父任务链。
//! 读取时按 name 精确匹配唯一的重建路径，未知 name 视为损坏记录。

use serde::{Deserialize, Serialize};

use crate::core::HiveError;
use crate::world::ResourceType;

use super::{
    TargetRef, Task, TaskGetRenewed, TaskKind, TaskOptions, TaskPickup, TaskRecharge,
    TaskTransfer, TaskWithdraw, GET_RENEWED_TASK_NAME, PICKUP_TASK_NAME, RECHARGE_TASK_NAME,
    TRANSFER_TASK_NAME, WITHDRAW_TASK_NAME,
};

/// 任务私有参数（各任务只用其中一部分）
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_energy: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMemory {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetRef>,
    #[serde(default)]
    pub options: TaskOptions,
    #[serde(default)]
    pub data: TaskData,
    #[serde(default)]
    pub tick: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<TaskMemory>>,
}

impl Task {
    pub fn to_memory(&self) -> TaskMemory {
        TaskMemory {
            name: self.name().to_string(),
            target: self.target.clone(),
            options: self.options.clone(),
            data: self.kind.instance().data(),
            tick: self.tick,
            parent: self.parent.as_ref().map(|p| Box::new(p.to_memory())),
        }
    }

    /// 从持久化记录重建任务（含整条父任务链）
    pub fn from_memory(memory: TaskMemory) -> Result<Task, HiveError> {
        let TaskMemory {
            name,
            target,
            options,
            data,
            tick,
            parent,
        } = memory;

        let kind = match name.as_str() {
            PICKUP_TASK_NAME => TaskKind::Pickup(TaskPickup),
            GET_RENEWED_TASK_NAME => TaskKind::GetRenewed(TaskGetRenewed),
            TRANSFER_TASK_NAME => TaskKind::Transfer(TaskTransfer::from_data(&data)),
            WITHDRAW_TASK_NAME => TaskKind::Withdraw(TaskWithdraw::from_data(&data)),
            RECHARGE_TASK_NAME => TaskKind::Recharge(TaskRecharge::from_data(&data)),
            _ => return Err(HiveError::UnknownTask(name)),
        };

        // 除 recharge 外所有任务都必须带目标
        if target.is_none() && !matches!(kind, TaskKind::Recharge(_)) {
            return Err(HiveError::MissingTarget(name));
        }

        let parent = match parent {
            Some(p) => Some(Box::new(Task::from_memory(*p)?)),
            None => None,
        };

        Ok(Task {
            kind,
            target,
            options,
            tick,
            parent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::Tasks;
    use crate::world::{Pos, Structure, StructureType};

    #[test]
    fn test_task_chain_survives_json() {
        let battery = Structure::new("battery", StructureType::Container, Pos::new(20, 21));
        let spawn = Structure::new("spawn1", StructureType::Spawn, Pos::new(20, 20));
        let task = Tasks::get_renewed(&spawn).fork(Tasks::withdraw(&battery));

        let json = serde_json::to_string(&task.to_memory()).unwrap();
        let restored: TaskMemory = serde_json::from_str(&json).unwrap();
        let rebuilt = Task::from_memory(restored).unwrap();

        assert_eq!(rebuilt, task);
        assert_eq!(rebuilt.parent.as_ref().unwrap().name(), GET_RENEWED_TASK_NAME);
    }

    #[test]
    fn test_record_format_is_plain_nested_json() {
        let ext = Structure::new("ext1", StructureType::Extension, Pos::new(3, 4));
        let value = serde_json::to_value(Tasks::transfer(&ext).to_memory()).unwrap();
        assert_eq!(value["name"], "transfer");
        assert_eq!(value["target"]["id"], "ext1");
        assert_eq!(value["options"]["oneShot"], true);
        assert_eq!(value["data"]["resourceType"], "energy");
        assert!(value.get("parent").is_none());
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let record: TaskMemory = serde_json::from_str(r#"{"name": "dance"}"#).unwrap();
        let err = Task::from_memory(record).unwrap_err();
        assert!(matches!(err, HiveError::UnknownTask(name) if name == "dance"));
    }

    #[test]
    fn test_targeted_task_without_target_is_rejected() {
        let record: TaskMemory = serde_json::from_str(r#"{"name": "pickup"}"#).unwrap();
        assert!(matches!(
            Task::from_memory(record),
            Err(HiveError::MissingTarget(_))
        ));
    }

    #[test]
    fn test_recharge_without_target_is_accepted() {
        let record: TaskMemory =
            serde_json::from_str(r#"{"name": "recharge", "data": {"minEnergy": 30}}"#).unwrap();
        let task = Task::from_memory(record).unwrap();
        assert_eq!(task.kind, TaskKind::Recharge(TaskRecharge { min_energy: 30 }));
        assert_eq!(task.options, TaskOptions::default());
    }
}
