//! Types that represent the core data model, such as `Record` and `Region`.
mod record;
mod region;

pub use record::{Record, Records};
pub use region::Region;
