use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session already ran (state: {state}); start a new session instead.")]
    AlreadyStarted { state: &'static str },
}
