//! # ord-inscribe
//!
//! Build Ordinals inscriptions on Bitcoin: encode the inscription envelope, commit to it in a
//! taproot output and reveal it by spending that output through the script path.
//!
//! Transactions are built and signed locally and returned hex encoded; broadcasting them is up
//! to the caller.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ord_inscribe::wallet::{
//!     CreateCommitTransactionArgs, OrdTransactionBuilder, ScriptType, UnspentOutput,
//! };
//! use ord_inscribe::utils::fees::reveal_funding;
//! use ord_inscribe::{Brc20, Inscription as _};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let private_key =
//!         bitcoin::PrivateKey::from_wif("cVkWbHmoCx6jS8AyPNQqvFr8V9r2qzDHJLaxGDQgDJfxT73w6fuU")?;
//!     let builder = OrdTransactionBuilder::new(private_key)?;
//!     let fee_rate = bitcoin::FeeRate::from_sat_per_vb(10).ok_or("bad fee rate")?;
//!
//!     let envelope = Brc20::deploy("ordi", 21_000_000, Some(1_000), None, None).envelope()?;
//!     let commitment = builder.commitment(&envelope)?;
//!     let commit_output_value = reveal_funding(commitment.leaf_script(), fee_rate)?;
//!
//!     let commit = builder.build_commit_transaction(CreateCommitTransactionArgs {
//!         inputs: vec![UnspentOutput {
//!             txid: "791b415dc6946d864d368a0e5ec5c09ee2ad39cf298bc6e3f9aec293732cfda7".parse()?,
//!             vout: 1,
//!             value: bitcoin::Amount::from_sat(50_000),
//!             address: None,
//!             script_type: ScriptType::P2WPKH,
//!         }],
//!         envelope,
//!         change_address: "tb1qzc8dhpkg5e4t6xyn4zmexxljc4nkje59dg3ark".to_string(),
//!         fee_rate,
//!         commit_output_value: Some(commit_output_value),
//!     })?;
//!     println!("commit: {}", commit.tx.hex());
//!
//!     // once the commit transaction has been broadcasted
//!     let reveal = commit.pending_reveal().build_reveal(
//!         &builder,
//!         "tb1qax89amll2uas5k92tmuc8rdccmqddqw94vrr86",
//!         fee_rate,
//!     )?;
//!     println!("reveal: {}", reveal.tx.hex());
//!
//!     Ok(())
//! }
//! ```
//!

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

pub mod error;
pub mod inscription;
mod result;
pub mod utils;
pub mod wallet;

pub use bitcoin;
pub use error::{InscriptionParseError, OrdError};
pub use inscription::brc20::{Brc20, Brc20Deploy, Brc20Mint, Brc20Transfer};
pub use inscription::envelope::InscriptionEnvelope;
pub use inscription::nft::Nft;
pub use inscription::payload::JsonPayload;
pub use inscription::Inscription;
pub use result::OrdResult;
pub use utils::constants;
pub use wallet::{
    CommitTransaction, CreateCommitTransactionArgs, InscriptionState, OrdParser,
    OrdTransactionBuilder, PendingReveal, RevealTransaction, RevealTransactionArgs, ScriptType,
    SignedTransaction, TaprootCommitment, UnspentOutput,
};
