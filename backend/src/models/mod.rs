pub mod account;
pub mod fortune;

pub use account::*;
pub use fortune::*;
