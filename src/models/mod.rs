pub mod breakdown;
pub mod settings;
pub mod trade;

pub use breakdown::*;
pub use settings::*;
pub use trade::*;
