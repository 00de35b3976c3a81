//! Session lifecycle: validation and the reactive state machine.

mod state;
mod validator;

pub use state::AuthState;
pub use validator::SessionValidator;
