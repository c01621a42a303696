//! 具体任务种类

mod get_renewed;
mod pickup;
mod recharge;
mod transfer;
mod withdraw;

pub use get_renewed::{TaskGetRenewed, GET_RENEWED_TASK_NAME};
pub use pickup::{TaskPickup, PICKUP_TASK_NAME};
pub use recharge::{TaskRecharge, RECHARGE_TASK_NAME};
pub use transfer::{TaskTransfer, TRANSFER_TASK_NAME};
pub use withdraw::{TaskWithdraw, WITHDRAW_TASK_NAME};
