//! Request handling for the sample service.

mod handlers;
mod workload;

pub use handlers::{handle_request, Route, GREETING};
pub use workload::{SimulatedWork, Workload};
