mod pool;
mod types;

pub use pool::{const_pool_parser, ConstPool, ConstValue, MemberRef};
pub use types::*;
