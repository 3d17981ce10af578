pub mod builder;
mod parser;
mod pending;

pub use builder::signer::{OrdSignature, SignatureHash, Signer};
pub use builder::{
    CommitPlan, CommitTransaction, CreateCommitTransactionArgs, OrdTransactionBuilder,
    RevealPlan, RevealTransaction, RevealTransactionArgs, ScriptType, SignedTransaction,
    TaprootCommitment, UnspentOutput,
};
pub use parser::OrdParser;
pub use pending::{InscriptionState, PendingReveal, RevealedInscription};
