pub mod ant_event;
pub mod game_face;
pub mod risk_event;
pub mod spf;

pub use ant_event::{AntEvent, NewAntEvent, TechniquesUsed};
pub use game_face::{GameFace, GameFaceSource, NewGameFace, MAX_POWER_WORDS};
pub use risk_event::RiskEvent;
pub use spf::{MetricScore, Policy, PolicyFields, WorryEntry};
