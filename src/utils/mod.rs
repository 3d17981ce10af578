mod address;
pub mod constants;
pub mod fees;
mod push_bytes;
#[cfg(test)]
pub mod test_utils;

pub use address::parse_address;
pub use push_bytes::bytes_to_push_bytes;
