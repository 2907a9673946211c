pub mod export;
pub mod probe;
pub mod profile;
pub mod telemetry;

pub use export::*;
pub use probe::*;
pub use profile::*;
pub use telemetry::*;
