//! 核心层：错误类型、tick 内核、优雅关闭

pub mod error;
pub mod kernel;
pub mod shutdown;

pub use error::HiveError;
pub use kernel::{Kernel, TickReport};
pub use shutdown::{ShutdownManager, ShutdownReason};
