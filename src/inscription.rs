pub mod brc20;
pub mod envelope;
pub mod nft;
pub mod payload;

use crate::{InscriptionEnvelope, OrdResult};

/// The inscription trait is used to write data to the envelope revealed by the reveal transaction.
pub trait Inscription {
    /// Returns the content type of the inscription.
    fn content_type(&self) -> String;

    /// Returns the body of the inscription.
    ///
    /// The body follows the header of the envelope:
    ///
    /// - OP_FALSE
    /// - OP_IF
    /// - ord
    /// - 0x01
    /// - {inscription.content_type()}
    /// - 0x00
    ///
    /// then it comes your data, split in pushes of at most 520 bytes,
    ///
    /// and then the footer:
    ///
    /// - OP_ENDIF
    fn data(&self) -> OrdResult<Vec<u8>>;

    /// Builds the envelope for this inscription.
    fn envelope(&self) -> OrdResult<InscriptionEnvelope> {
        InscriptionEnvelope::new(self.content_type(), self.data()?)
    }
}
