use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};
use spl_discriminator::SplDiscriminate;
use spl_pod::primitives::{PodU16, PodU64};

use crate::{constants::MAX_FEE_BASIS_POINTS, error::FeeHookError};

/// Fee charged in wrapped SOL on every transfer of a hooked mint.
/// Chosen once per mint when the registry is initialized.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeePolicy {
    /// Same fee for every transfer, regardless of size
    Fixed { amount: u64 },
    /// Basis points of the transferred amount, capped at `maximum_fee`
    Proportional { basis_points: u16, maximum_fee: u64 },
}

impl FeePolicy {
    pub fn validate(&self) -> Result<()> {
        match self {
            FeePolicy::Fixed { .. } => Ok(()),
            FeePolicy::Proportional { basis_points, .. } => {
                require!(
                    *basis_points <= MAX_FEE_BASIS_POINTS,
                    FeeHookError::InvalidFeePolicy
                );
                Ok(())
            }
        }
    }

    /// Fee owed for a transfer of `amount` tokens of the hooked mint
    pub fn compute(&self, amount: u64) -> Result<u64> {
        match *self {
            FeePolicy::Fixed { amount: fee } => Ok(fee),
            FeePolicy::Proportional {
                basis_points,
                maximum_fee,
            } => {
                let fee = (amount as u128)
                    .checked_mul(basis_points as u128)
                    .and_then(|v| v.checked_div(MAX_FEE_BASIS_POINTS as u128))
                    .ok_or(FeeHookError::MathOverflow)?;
                let fee = u64::try_from(fee).map_err(|_| error!(FeeHookError::MathOverflow))?;

                Ok(std::cmp::min(fee, maximum_fee))
            }
        }
    }
}

const FIXED_KIND: u8 = 1;
const PROPORTIONAL_KIND: u8 = 2;

/// Fixed-size form of [`FeePolicy`] stored as its own TLV entry in the
/// extra account meta list account, next to the account metas.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, SplDiscriminate)]
#[discriminator_hash_input("wsol_fee_hook:fee_policy")]
pub struct FeePolicyRecord {
    pub kind: u8,
    pub basis_points: PodU16,
    /// Fixed fee, or the cap of a proportional fee
    pub amount: PodU64,
}

impl From<FeePolicy> for FeePolicyRecord {
    fn from(policy: FeePolicy) -> Self {
        match policy {
            FeePolicy::Fixed { amount } => Self {
                kind: FIXED_KIND,
                basis_points: PodU16::from(0),
                amount: PodU64::from(amount),
            },
            FeePolicy::Proportional {
                basis_points,
                maximum_fee,
            } => Self {
                kind: PROPORTIONAL_KIND,
                basis_points: PodU16::from(basis_points),
                amount: PodU64::from(maximum_fee),
            },
        }
    }
}

impl TryFrom<&FeePolicyRecord> for FeePolicy {
    type Error = anchor_lang::error::Error;

    fn try_from(record: &FeePolicyRecord) -> Result<Self> {
        match record.kind {
            FIXED_KIND => Ok(FeePolicy::Fixed {
                amount: u64::from(record.amount),
            }),
            PROPORTIONAL_KIND => Ok(FeePolicy::Proportional {
                basis_points: u16::from(record.basis_points),
                maximum_fee: u64::from(record.amount),
            }),
            _ => err!(FeeHookError::InvalidFeePolicy),
        }
    }
}
