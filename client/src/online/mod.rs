mod session_runner;

pub use session_runner::run_online_session;
