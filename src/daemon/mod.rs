mod service;

pub use service::{router, run};
