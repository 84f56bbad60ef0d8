use crate::errors::BinderyResult;

/// Hook applied to serialized cache values around tier storage
/// (e.g. encryption). Runs after the compression hook on encode and
/// before it on decode, always before any validity check.
pub trait ValueTransform: Send + Sync {
    fn encode(&self, bytes: Vec<u8>) -> BinderyResult<Vec<u8>>;
    fn decode(&self, bytes: Vec<u8>) -> BinderyResult<Vec<u8>>;
}
