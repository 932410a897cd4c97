//! Schedule core: weekday calendar generation, synchronization of persisted
//! rows with the months that must exist, episode numbering, stock summary
//! and the speaker-aware script colorizer.

pub mod calendar;
pub mod models;
pub mod numbering;
pub mod script;
pub mod stock;
pub mod sync;


pub use calendar::{generate_month, weekdays_in_month};
pub use models::*;
pub use numbering::{canonical_label, renumber, NumberingReport};
pub use script::{colorize, render_html, ScriptLine, Speaker, SpeakerProfile, SpeakerSet};
pub use stock::{summarize, StockSummary};
pub use sync::{synchronize, SyncOptions, SyncOutcome};
