pub mod executor;

pub use executor::{HttpTransportError, HttpTransportErrorKind, ReqwestExecutor};
