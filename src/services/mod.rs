pub mod foreign_profile;
pub mod profile_manager;
pub mod profile_store;
pub mod prober;
pub mod synthesizer;
pub mod telemetry;
pub mod webdav;

pub use foreign_profile::{parse_foreign_profile, ForeignFields};
pub use profile_manager::ProfileManager;
pub use profile_store::{MemorySettingsStore, ProfileStore, SettingsStore};
pub use prober::ConnectivityProber;
pub use synthesizer::{synthesize_profile, synthesize_url};
pub use telemetry::{DebugToggles, TelemetrySink};
