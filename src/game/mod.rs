pub mod answer;
pub mod identity;
pub mod session;

pub use identity::{GameSettings, IdentityCategory};
pub use session::{play_turn, start_game, GameSession, GameState, TurnOutcome};
