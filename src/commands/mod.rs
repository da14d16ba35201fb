pub mod backup;
pub mod settings;
pub mod stats;
pub mod trades;

pub use backup::*;
pub use settings::*;
pub use stats::*;
pub use trades::*;
