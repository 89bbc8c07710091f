mod category;
mod expense;
mod ledger;
mod money;
mod subscription;

pub use category::*;
pub use expense::*;
pub use ledger::*;
pub use money::*;
pub use subscription::*;
