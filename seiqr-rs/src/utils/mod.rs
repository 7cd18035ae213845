mod ascii_plot;
mod stats;

pub use ascii_plot::*;
pub use stats::*;
pub(crate) use crate::{INF, NAN};
