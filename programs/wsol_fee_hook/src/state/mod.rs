pub mod fee_policy;
pub mod registry;

pub use fee_policy::*;
pub use registry::*;
