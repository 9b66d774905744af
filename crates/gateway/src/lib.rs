#![forbid(unsafe_code)]

pub mod contract;
pub mod http;

pub use contract::{
    DEFAULT_SEARCH_LIMIT, GatewayError, InMemoryGateway, LessonGateway, ProgressGateway,
    QuizGateway, SyllabusGateway,
};
pub use http::{GatewayConfig, HttpGateway};
