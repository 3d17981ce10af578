use bitcoin::{Amount, FeeRate, Script, Transaction};

use super::constants::DUST_LIMIT;
use crate::{OrdError, OrdResult};

/// Version, input/output counts and locktime.
const COMMIT_TX_OVERHEAD_VBYTES: u64 = 10;
/// Outpoint, sequence and a legacy-equivalent signature budget.
const COMMIT_INPUT_VBYTES: u64 = 112;
/// Value and script pubkey.
const COMMIT_OUTPUT_VBYTES: u64 = 34;
/// Transaction overhead plus the single script-path input.
const REVEAL_INPUT_VBYTES: u64 = 100;
const REVEAL_OUTPUT_VBYTES: u64 = 43;

/// Conservative virtual size of a commit transaction.
///
/// This is an approximation which does not look at the actual input types;
/// use [`calculate_transaction_fees`] on the signed transaction when the exact
/// fee rate matters.
pub fn estimate_commit_vsize(inputs: usize, outputs: usize) -> u64 {
    COMMIT_TX_OVERHEAD_VBYTES
        + inputs as u64 * COMMIT_INPUT_VBYTES
        + outputs as u64 * COMMIT_OUTPUT_VBYTES
}

/// Virtual size of a reveal transaction spending the commit output through a
/// leaf script of `script_len` bytes.
pub fn estimate_reveal_vsize(script_len: usize) -> u64 {
    let script_len = script_len as u64;

    REVEAL_INPUT_VBYTES + script_len + REVEAL_OUTPUT_VBYTES + script_len.div_ceil(4)
}

pub fn estimate_commit_fee(inputs: usize, outputs: usize, fee_rate: FeeRate) -> OrdResult<Amount> {
    fee_for_vsize(estimate_commit_vsize(inputs, outputs), fee_rate)
}

/// Fee of the reveal transaction spending `leaf_script`.
///
/// The size is computed from the whole leaf (`<key> OP_CHECKSIG` plus the envelope,
/// 34 bytes more than the envelope alone): a 37 bytes "Hello, Ordinals!" envelope
/// gives a 71 bytes leaf and a 232 vbytes reveal.
pub fn estimate_reveal_fee(leaf_script: &Script, fee_rate: FeeRate) -> OrdResult<Amount> {
    fee_for_vsize(estimate_reveal_vsize(leaf_script.len()), fee_rate)
}

/// Smallest commit output which still leaves a non-dust reveal output.
pub fn reveal_funding(leaf_script: &Script, fee_rate: FeeRate) -> OrdResult<Amount> {
    estimate_reveal_fee(leaf_script, fee_rate)?
        .checked_add(DUST_LIMIT)
        .ok_or(OrdError::FeeOverflow)
}

/// Fee of an already built transaction, from its witness-discounted size.
pub fn calculate_transaction_fees(transaction: &Transaction, fee_rate: FeeRate) -> OrdResult<Amount> {
    fee_for_vsize(transaction.vsize() as u64, fee_rate)
}

fn fee_for_vsize(vbytes: u64, fee_rate: FeeRate) -> OrdResult<Amount> {
    fee_rate.fee_vb(vbytes).ok_or(OrdError::FeeOverflow)
}

#[cfg(test)]
mod tests {
    use bitcoin::ScriptBuf;

    use super::*;

    #[test]
    fn test_should_estimate_commit_vsize() {
        assert_eq!(estimate_commit_vsize(0, 0), 10);
        assert_eq!(estimate_commit_vsize(1, 1), 156);
        assert_eq!(estimate_commit_vsize(1, 2), 190);
        assert_eq!(estimate_commit_vsize(3, 2), 414);
    }

    #[test]
    fn additional_input_and_output_sizes_are_correct() {
        let base = estimate_commit_vsize(2, 1);
        assert_eq!(estimate_commit_vsize(3, 1) - base, 112);
        assert_eq!(estimate_commit_vsize(2, 2) - base, 34);
    }

    #[test]
    fn test_should_estimate_reveal_vsize() {
        assert_eq!(estimate_reveal_vsize(0), 143);
        assert_eq!(estimate_reveal_vsize(4), 148);
        // witness share is rounded up
        assert_eq!(estimate_reveal_vsize(71), 143 + 71 + 18);
        assert_eq!(estimate_reveal_vsize(72), 143 + 72 + 18);
    }

    #[test]
    fn estimate_commit_fee_scales_with_fee_rate() {
        let fee_rate = FeeRate::from_sat_per_vb(5).unwrap();
        let fee = estimate_commit_fee(2, 2, fee_rate).unwrap();

        assert_eq!(fee, Amount::from_sat(estimate_commit_vsize(2, 2) * 5));
    }

    #[test]
    fn estimate_reveal_fee_uses_script_length() {
        let fee_rate = FeeRate::from_sat_per_vb(3).unwrap();
        let script = ScriptBuf::from_bytes(vec![0x51; 200]);

        let fee = estimate_reveal_fee(&script, fee_rate).unwrap();
        assert_eq!(fee, Amount::from_sat((143 + 200 + 50) * 3));
    }

    #[test]
    fn estimate_reveal_fee_counts_the_key_locked_leaf() {
        let envelope = crate::InscriptionEnvelope::new("text/plain", "Hello, Ordinals!").unwrap();
        let builder = crate::OrdTransactionBuilder::new(crate::utils::test_utils::signing_key()).unwrap();
        let commitment = builder.commitment(&envelope).unwrap();
        let fee_rate = FeeRate::from_sat_per_vb(1).unwrap();

        assert_eq!(envelope.script().len(), 37);
        assert_eq!(commitment.leaf_script().len(), 71);
        assert_eq!(
            estimate_reveal_fee(commitment.leaf_script(), fee_rate).unwrap(),
            Amount::from_sat(232)
        );
    }

    #[test]
    fn reveal_funding_leaves_dust_for_the_output() {
        let fee_rate = FeeRate::from_sat_per_vb(1).unwrap();
        let script = ScriptBuf::from_bytes(vec![0x51; 8]);

        let funding = reveal_funding(&script, fee_rate).unwrap();
        assert_eq!(funding, Amount::from_sat(143 + 8 + 2 + 546));
    }

    #[test]
    fn fee_overflow_is_reported() {
        let fee_rate = FeeRate::from_sat_per_vb(u64::MAX / 250).unwrap();
        assert!(matches!(
            estimate_commit_fee(1_000, 2, fee_rate),
            Err(OrdError::FeeOverflow)
        ));
    }
}
