//! Ordinals inscription envelope.
//!
//! ```text
//! OP_FALSE OP_IF
//!   OP_PUSHBYTES_3 "ord"
//!   0x01 <push content_type>
//!   0x00 <push chunk_1> <push chunk_2> ...
//! OP_ENDIF
//! ```
//!
//! The body is split in chunks of [`MAX_SCRIPT_ELEMENT_SIZE`] bytes, each one
//! pushed with the smallest push opcode able to frame it.

use bitcoin::opcodes::all::{
    OP_ENDIF, OP_IF, OP_PUSHBYTES_1, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4,
};
use bitcoin::opcodes::{OP_0, OP_FALSE};
use bitcoin::script::Builder as ScriptBuilder;
use bitcoin::{Script, ScriptBuf};
use serde::{Deserialize, Serialize};

use crate::utils::bytes_to_push_bytes;
use crate::utils::constants::{BODY_TAG, CONTENT_TYPE_TAG, MAX_SCRIPT_ELEMENT_SIZE, PROTOCOL_ID};
use crate::{InscriptionParseError, OrdError, OrdResult};

/// Envelope carrying the content type and the body of an inscription.
///
/// The script is derived once from the content type and the content and the
/// envelope is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "EnvelopeFields", try_from = "EnvelopeFields")]
pub struct InscriptionEnvelope {
    content_type: String,
    content: Vec<u8>,
    script: ScriptBuf,
}

impl InscriptionEnvelope {
    /// Builds the envelope script for `content_type` and `content`.
    ///
    /// Fails only if the content type does not fit in a single script element.
    pub fn new(content_type: impl Into<String>, content: impl Into<Vec<u8>>) -> OrdResult<Self> {
        let content_type = content_type.into();
        let content = content.into();
        let script = Self::encode(&content_type, &content)?;

        Ok(Self {
            content_type,
            content,
            script,
        })
    }

    /// Encodes the envelope script.
    pub fn encode(content_type: &str, content: &[u8]) -> OrdResult<ScriptBuf> {
        if content_type.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(OrdError::EncodingOverflow {
                field: "content type",
                len: content_type.len(),
                max: MAX_SCRIPT_ELEMENT_SIZE,
            });
        }

        let mut builder = ScriptBuilder::new()
            .push_opcode(OP_FALSE)
            .push_opcode(OP_IF)
            .push_slice(PROTOCOL_ID)
            // the tag is a bare byte, not a push
            .push_opcode(OP_PUSHBYTES_1)
            .push_slice(bytes_to_push_bytes(content_type.as_bytes())?)
            .push_opcode(OP_0);

        for chunk in content.chunks(MAX_SCRIPT_ELEMENT_SIZE) {
            builder = builder.push_slice(bytes_to_push_bytes(chunk)?);
        }

        Ok(builder.push_opcode(OP_ENDIF).into_script())
    }

    /// Decodes an envelope script back into its content type and content.
    ///
    /// The script must start with the envelope header and end with `OP_ENDIF`.
    pub fn decode(script: &Script) -> Result<Self, InscriptionParseError> {
        let mut reader = EnvelopeReader::new(script.as_bytes());

        reader.expect(OP_FALSE.to_u8())?;
        reader.expect(OP_IF.to_u8())?;
        if reader.read_push()? != PROTOCOL_ID {
            return Err(InscriptionParseError::ProtocolId);
        }
        reader.expect(CONTENT_TYPE_TAG)?;
        let content_type = String::from_utf8(reader.read_push()?.to_vec())
            .map_err(|_| InscriptionParseError::ContentType)?;
        reader.expect(BODY_TAG)?;

        let mut content = Vec::new();
        while reader.peek()? != OP_ENDIF.to_u8() {
            content.extend_from_slice(reader.read_push()?);
        }
        reader.expect(OP_ENDIF.to_u8())?;
        reader.finish()?;

        Ok(Self {
            content_type,
            content,
            script: script.to_owned(),
        })
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn script(&self) -> &Script {
        &self.script
    }
}

#[derive(Serialize, Deserialize)]
struct EnvelopeFields {
    content_type: String,
    #[serde(with = "hex::serde")]
    content: Vec<u8>,
}

impl From<InscriptionEnvelope> for EnvelopeFields {
    fn from(envelope: InscriptionEnvelope) -> Self {
        Self {
            content_type: envelope.content_type,
            content: envelope.content,
        }
    }
}

impl TryFrom<EnvelopeFields> for InscriptionEnvelope {
    type Error = OrdError;

    fn try_from(fields: EnvelopeFields) -> Result<Self, Self::Error> {
        Self::new(fields.content_type, fields.content)
    }
}

/// Cursor over raw envelope bytes.
struct EnvelopeReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> EnvelopeReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn peek(&self) -> Result<u8, InscriptionParseError> {
        self.bytes
            .get(self.offset)
            .copied()
            .ok_or(InscriptionParseError::UnexpectedEnd(self.offset))
    }

    fn next_byte(&mut self) -> Result<u8, InscriptionParseError> {
        let byte = self.peek()?;
        self.offset += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], InscriptionParseError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(InscriptionParseError::UnexpectedEnd(self.bytes.len()))?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn expect(&mut self, expected: u8) -> Result<(), InscriptionParseError> {
        let offset = self.offset;
        match self.next_byte()? {
            byte if byte == expected => Ok(()),
            opcode => Err(InscriptionParseError::UnexpectedOpcode { offset, opcode }),
        }
    }

    /// Reads a single data push and returns its payload.
    fn read_push(&mut self) -> Result<&'a [u8], InscriptionParseError> {
        let offset = self.offset;
        let opcode = self.next_byte()?;

        let len = match opcode {
            n if n < OP_PUSHDATA1.to_u8() => n as usize,
            n if n == OP_PUSHDATA1.to_u8() => self.next_byte()? as usize,
            n if n == OP_PUSHDATA2.to_u8() => {
                let len = self.take(2)?;
                u16::from_le_bytes([len[0], len[1]]) as usize
            }
            n if n == OP_PUSHDATA4.to_u8() => {
                let len = self.take(4)?;
                u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize
            }
            opcode => return Err(InscriptionParseError::UnexpectedOpcode { offset, opcode }),
        };

        self.take(len)
    }

    fn finish(&self) -> Result<(), InscriptionParseError> {
        if self.offset == self.bytes.len() {
            Ok(())
        } else {
            Err(InscriptionParseError::TrailingBytes(self.offset))
        }
    }
}

#[cfg(test)]
mod test {
    use hex_literal::hex;

    use super::*;

    fn round_trip(content_type: &str, content: &[u8]) -> InscriptionEnvelope {
        let envelope = InscriptionEnvelope::new(content_type, content).unwrap();
        let decoded = InscriptionEnvelope::decode(envelope.script()).unwrap();
        assert_eq!(decoded, envelope);
        decoded
    }

    #[test]
    fn test_should_encode_text_envelope() {
        let envelope = InscriptionEnvelope::new("text/plain", "Hello, Ordinals!").unwrap();

        assert_eq!(
            envelope.script().as_bytes(),
            hex!(
                "0063036f7264"
                "010a746578742f706c61696e"
                "00"
                "1048656c6c6f2c204f7264696e616c7321"
                "68"
            )
        );
    }

    #[test]
    fn test_should_frame_envelope() {
        for content in [vec![], vec![0x68], vec![0; 75], vec![0xff; 1_500]] {
            let envelope = InscriptionEnvelope::new("image/png", content).unwrap();
            let bytes = envelope.script().as_bytes();

            assert_eq!(&bytes[..2], &[0x00, 0x63]);
            assert_eq!(bytes.last(), Some(&0x68));
        }
    }

    #[test]
    fn test_should_round_trip_empty_content() {
        let envelope = round_trip("text/plain", &[]);

        assert!(envelope.content().is_empty());
        assert_eq!(&envelope.script().as_bytes()[18..], &[0x00, 0x68]);
    }

    #[test]
    fn test_should_split_content_in_chunks() {
        let content: Vec<u8> = (0..1_200).map(|i| (i % 251) as u8).collect();
        let envelope = round_trip("application/octet-stream", &content);
        let bytes = envelope.script().as_bytes();

        // header: 6 bytes, tag: 1, content type push: 1 + 24, body tag: 1
        let body = &bytes[33..];
        assert_eq!(&body[..3], &[0x4d, 0x08, 0x02]);
        assert_eq!(&body[3..523], &content[..520]);
        assert_eq!(&body[523..526], &[0x4d, 0x08, 0x02]);
        assert_eq!(&body[526..1046], &content[520..1040]);
        assert_eq!(&body[1046..1048], &[0x4c, 0xa0]);
        assert_eq!(&body[1048..1208], &content[1040..]);
        assert_eq!(&body[1208..], &[0x68]);
    }

    #[test]
    fn test_should_use_direct_push_below_pushdata1() {
        let envelope = InscriptionEnvelope::new("a/b", vec![7; 75]).unwrap();
        let bytes = envelope.script().as_bytes();
        assert_eq!(bytes[12], 75);

        let envelope = InscriptionEnvelope::new("a/b", vec![7; 76]).unwrap();
        let bytes = envelope.script().as_bytes();
        assert_eq!(&bytes[12..14], &[0x4c, 76]);
    }

    #[test]
    fn test_should_round_trip_brc20_deploy() {
        let payload = br#"{"p":"brc-20","op":"deploy","tick":"test","max":"21000000","lim":"1000"}"#;
        let envelope = round_trip("text/plain;charset=utf-8", payload);

        assert_eq!(envelope.content(), payload.as_slice());
    }

    #[test]
    fn test_should_round_trip_binary_content() {
        round_trip("image/png", &hex!("89504e470d0a1a0a0000000d49484452"));
        round_trip("text/plain", &[0x68; 300]);
    }

    #[test]
    fn test_should_reject_oversized_content_type() {
        let content_type = "x".repeat(MAX_SCRIPT_ELEMENT_SIZE + 1);

        assert!(matches!(
            InscriptionEnvelope::new(content_type, "body"),
            Err(OrdError::EncodingOverflow { len: 521, .. })
        ));
    }

    #[test]
    fn test_should_reject_bad_envelopes() {
        assert_eq!(
            InscriptionEnvelope::decode(Script::from_bytes(&[])),
            Err(InscriptionParseError::UnexpectedEnd(0))
        );
        assert_eq!(
            InscriptionEnvelope::decode(Script::from_bytes(&hex!("0063036f7264"))),
            Err(InscriptionParseError::UnexpectedEnd(6))
        );
        assert_eq!(
            InscriptionEnvelope::decode(Script::from_bytes(&hex!("0063036f7267010161"))),
            Err(InscriptionParseError::ProtocolId)
        );
        assert_eq!(
            InscriptionEnvelope::decode(Script::from_bytes(&hex!("0063036f726401016100ac68"))),
            Err(InscriptionParseError::UnexpectedOpcode {
                offset: 10,
                opcode: 0xac
            })
        );

        let mut bytes = InscriptionEnvelope::new("a/b", "c")
            .unwrap()
            .script()
            .to_bytes();
        bytes.push(0x51);
        assert_eq!(
            InscriptionEnvelope::decode(Script::from_bytes(&bytes)),
            Err(InscriptionParseError::TrailingBytes(bytes.len() - 1))
        );
    }

    #[test]
    fn test_should_serialize_envelope() {
        let envelope = InscriptionEnvelope::new("text/plain", "ord").unwrap();
        let json = serde_json::to_string(&envelope).unwrap();

        assert_eq!(json, r#"{"content_type":"text/plain","content":"6f7264"}"#);
        assert_eq!(
            serde_json::from_str::<InscriptionEnvelope>(&json).unwrap(),
            envelope
        );
    }
}
