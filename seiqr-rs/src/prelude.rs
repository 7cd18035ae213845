pub use crate::error::*;
pub use crate::models::*;
pub use crate::params::*;
pub use crate::sim::*;
pub use crate::trackers::*;
pub use crate::utils::*;
pub use crate::{Real, Time};
