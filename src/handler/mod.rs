// Request handling: routing, the file responder, and the POST form store

pub mod form;
pub mod router;
pub mod static_files;

pub use router::handle_request;
pub use static_files::serve_file;
