pub mod error;
pub use error::{WebError, WebResult};

mod state;
pub use state::{AppState, RunRecord};

pub mod dto;

pub mod routes;

pub mod doc;
