mod broadcaster;
mod session_rng;

pub mod tictactoe;

pub use broadcaster::{ChannelEventSink, GameEventSink, GameFinished, NullEventSink};
pub use session_rng::{RandomSource, SessionRng};
