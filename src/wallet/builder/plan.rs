use bitcoin::{Amount, FeeRate, OutPoint, Txid};

use super::UnspentOutput;
use crate::utils::constants::DUST_LIMIT;
use crate::utils::fees::estimate_commit_fee;
use crate::{OrdError, OrdResult};

/// Funding plan of a commit transaction.
///
/// `total_input == commit_output_value + change_value + fee_paid`, and the
/// change is either zero or above the dust limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    inputs: Vec<UnspentOutput>,
    commit_output_value: Amount,
    change_value: Amount,
    fee_paid: Amount,
}

impl CommitPlan {
    /// Greedily selects `utxos`, in the given order, until they cover the
    /// commit output and the fee of a single-output transaction.
    pub fn select(
        utxos: &[UnspentOutput],
        commit_output_value: Amount,
        fee_rate: FeeRate,
    ) -> OrdResult<Self> {
        if commit_output_value < DUST_LIMIT {
            return Err(OrdError::DustViolation {
                amount: commit_output_value,
                dust_limit: DUST_LIMIT,
            });
        }

        let mut selected = Vec::new();
        let mut total = Amount::ZERO;
        for utxo in utxos {
            selected.push(utxo.clone());
            total = total
                .checked_add(utxo.value)
                .ok_or(OrdError::FeeOverflow)?;

            let fee = estimate_commit_fee(selected.len(), 1, fee_rate)?;
            let required = commit_output_value
                .checked_add(fee)
                .ok_or(OrdError::FeeOverflow)?;
            if total >= required {
                return Self::allocate(selected, total, commit_output_value, fee_rate);
            }
        }

        let fee = estimate_commit_fee(utxos.len().max(1), 1, fee_rate)?;
        Err(OrdError::InsufficientFunds {
            required: commit_output_value
                .checked_add(fee)
                .ok_or(OrdError::FeeOverflow)?,
            available: total,
        })
    }

    /// Splits `total` between the commit output, the change and the fee.
    ///
    /// A change output not above the dust limit is dropped and its value goes to the fee.
    fn allocate(
        inputs: Vec<UnspentOutput>,
        total: Amount,
        commit_output_value: Amount,
        fee_rate: FeeRate,
    ) -> OrdResult<Self> {
        let fee_with_change = estimate_commit_fee(inputs.len(), 2, fee_rate)?;
        let change = total
            .checked_sub(commit_output_value)
            .and_then(|value| value.checked_sub(fee_with_change));

        let (change_value, fee_paid) = match change {
            Some(change) if change > DUST_LIMIT => (change, fee_with_change),
            _ => (
                Amount::ZERO,
                total
                    .checked_sub(commit_output_value)
                    .ok_or(OrdError::FeeOverflow)?,
            ),
        };
        debug!(
            "selected {} inputs for {total}: commit {commit_output_value}, change {change_value}, fee {fee_paid}",
            inputs.len()
        );

        Ok(Self {
            inputs,
            commit_output_value,
            change_value,
            fee_paid,
        })
    }

    pub fn inputs(&self) -> &[UnspentOutput] {
        &self.inputs
    }

    pub fn commit_output_value(&self) -> Amount {
        self.commit_output_value
    }

    /// Zero when no change output is created.
    pub fn change_value(&self) -> Amount {
        self.change_value
    }

    pub fn fee_paid(&self) -> Amount {
        self.fee_paid
    }

    pub fn total_input(&self) -> Amount {
        self.inputs.iter().map(|input| input.value).sum()
    }

    pub fn has_change(&self) -> bool {
        self.change_value > Amount::ZERO
    }
}

/// Amounts of a reveal transaction.
///
/// `output_amount + fee == input_amount` and `output_amount >= DUST_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealPlan {
    commit_txid: Txid,
    commit_vout: u32,
    input_amount: Amount,
    output_amount: Amount,
    fee: Amount,
}

impl RevealPlan {
    /// Fails with [`OrdError::DustViolation`] when the fee leaves less than the dust limit.
    pub fn new(commit_txid: Txid, commit_vout: u32, input_amount: Amount, fee: Amount) -> OrdResult<Self> {
        let output_amount = input_amount.checked_sub(fee).unwrap_or(Amount::ZERO);
        if output_amount < DUST_LIMIT {
            return Err(OrdError::DustViolation {
                amount: output_amount,
                dust_limit: DUST_LIMIT,
            });
        }
        debug!("reveal of {input_amount}: output {output_amount}, fee {fee}");

        Ok(Self {
            commit_txid,
            commit_vout,
            input_amount,
            output_amount,
            fee,
        })
    }

    pub fn commit_outpoint(&self) -> OutPoint {
        OutPoint {
            txid: self.commit_txid,
            vout: self.commit_vout,
        }
    }

    pub fn input_amount(&self) -> Amount {
        self.input_amount
    }

    pub fn output_amount(&self) -> Amount {
        self.output_amount
    }

    pub fn fee(&self) -> Amount {
        self.fee
    }
}
