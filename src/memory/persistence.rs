//! 内存持久化
//!
//! 将 Memory 写入/从 JSON 文件加载，模拟“每 tick 进程重启、只有内存存活”的运行环境。

use std::path::{Path, PathBuf};

use super::Memory;

/// 单文件 JSON 持久化
#[derive(Debug)]
pub struct MemoryStore {
    path: PathBuf,
}

impl MemoryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 从 JSON 文件加载；文件不存在时返回空内存
    pub fn load(&self) -> anyhow::Result<Memory> {
        if !self.path.exists() {
            return Ok(Memory::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        let memory = serde_json::from_str(&data)?;
        Ok(memory)
    }

    /// 写入 JSON 文件；父目录不存在时自动创建
    pub fn save(&self, memory: &Memory) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(memory)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::CreepMemory;
    use crate::tasks::Tasks;
    use crate::world::{Pos, Structure, StructureType};

    #[test]
    fn test_missing_file_loads_empty_memory() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(dir.path().join("memory.json"));
        assert_eq!(store.load().unwrap(), Memory::default());
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(dir.path().join("nested/state/memory.json"));

        let link = Structure::new("link1", StructureType::Link, Pos::new(24, 25));
        let mut creep = CreepMemory::new("queen", "spawn1:queen", "W1N1");
        creep.task = Some(Tasks::withdraw(&link).to_memory());
        let mut memory = Memory::new();
        memory.tick = 41;
        memory.creeps.insert("queen_a".into(), creep);

        store.save(&memory).unwrap();
        assert_eq!(store.load().unwrap(), memory);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(MemoryStore::new(&path).load().is_err());
    }
}
