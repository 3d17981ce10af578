use bitcoin::Amount;

pub const PROTOCOL_ID: [u8; 3] = *b"ord";
/// Tag 1, representing the MIME type of the body.
pub const CONTENT_TYPE_TAG: u8 = 1;
/// Empty push separating the fields from the body.
pub const BODY_TAG: u8 = 0;
/// Maximum size of a single script element, content is chunked by this size.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
/// Minimum value of a standard output
pub const DUST_LIMIT: Amount = Amount::from_sat(546);
/// MIME type used for BRC-20 operations
pub const BRC20_CONTENT_TYPE: &str = "text/plain;charset=utf-8";
/// MIME type used for generic JSON payloads
pub const JSON_CONTENT_TYPE: &str = "application/json";
