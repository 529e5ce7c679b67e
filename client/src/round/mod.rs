pub mod coordinator;
pub mod phase;
pub mod ready_barrier;
pub mod round_state;
