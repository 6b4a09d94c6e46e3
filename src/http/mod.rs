// HTTP building blocks: MIME lookup and response primitives

pub mod mime;
pub mod response;

pub use response::{send_http_error, ReplyGuard, ResponseBody};
