pub mod scenario;
mod util;

pub use util::{parse_seeds, split_csv};
