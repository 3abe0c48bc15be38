//! Expression evaluation: submit to the service, poll until terminal.

mod evaluation;
pub mod policy;
pub mod types;

pub use evaluation::{Evaluation, Sleeper};
pub use policy::PollPolicy;
pub use types::{EvaluationSnapshot, Phase};
