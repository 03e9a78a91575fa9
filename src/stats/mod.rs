mod data_point;
mod metric;
mod mode;
mod resolve;

pub use data_point::DataPoint;
pub use metric::Metric;
pub use mode::{parse_modes, split_list, Formats, Mode};
pub use resolve::resolve;
