//! Length-prefixed TCP control channel used to stub out collaborating
//! processes in end-to-end tests (spec §4.10).

pub mod central;
pub mod errors;
pub mod message;
pub mod stub;

pub use central::{connect, StubCentral};
pub use errors::StubError;
pub use message::{read_message, write_message, DEFAULT_PORT};
pub use stub::{SimpleStub, Stub};
