pub mod client;
pub mod http;
pub mod types;

pub use client::{Executor, ExecutorError};
pub use http::HttpExecutor;
pub use types::{ExecutionResponse, ResponseBody};
