pub mod codes;
pub mod decode;

pub use codes::{MessageKind, Severity};
pub use decode::{decode, DecodedPayload};
