use crate::domain::allocation::{AllocationLine, AllocationRequest, AllocationResult, Settlement};
use crate::domain::money::Money;
use crate::domain::obligation::ObligationId;
use crate::error::AllocationError;
use std::collections::HashSet;
use tracing::debug;

/// Splits a tendered amount across the selected obligations.
///
/// Obligations marked `forced_full` are paid first and in full. The rest are
/// settled in full smallest-first (ties keep input order) until the first one
/// that no longer fits; whatever is left is then shared proportionally over that
/// one and every larger obligation, rounded to the minor unit. Cash beyond the
/// total owed is reported as `unallocated_remainder`.
///
/// The function is pure: identical requests yield identical results, and the
/// request is never modified. All failures are detected before any amount is
/// assigned.
pub fn allocate(request: &AllocationRequest) -> Result<AllocationResult, AllocationError> {
    let forced = validate(request)?;
    let obligations = &request.obligations;

    let forced_sum: Money = obligations
        .iter()
        .filter(|o| forced.contains(&o.id))
        .map(|o| o.due_money())
        .sum();
    if request.tendered < forced_sum {
        return Err(AllocationError::InsufficientFundsForForcedItems {
            tendered: request.tendered,
            required: forced_sum,
        });
    }

    let mut allocated = vec![Money::ZERO; obligations.len()];
    let mut candidates = Vec::with_capacity(obligations.len());
    for (i, obligation) in obligations.iter().enumerate() {
        if forced.contains(&obligation.id) {
            allocated[i] = obligation.due_money();
        } else {
            candidates.push(i);
        }
    }

    let mut remaining = request.tendered - forced_sum;
    let candidate_sum: Money = candidates.iter().map(|&i| obligations[i].due_money()).sum();
    debug!(
        tendered = %request.tendered,
        forced = %forced_sum,
        candidates = %candidate_sum,
        "allocating payment"
    );

    let mut unallocated_remainder = Money::ZERO;
    if remaining >= candidate_sum {
        for &i in &candidates {
            allocated[i] = obligations[i].due_money();
        }
        unallocated_remainder = remaining - candidate_sum;
    } else {
        // Stable: equal amounts keep their input order.
        candidates.sort_by_key(|&i| obligations[i].due);

        let mut cut = candidates.len();
        for (pos, &i) in candidates.iter().enumerate() {
            let due = obligations[i].due_money();
            if remaining < due {
                cut = pos;
                break;
            }
            allocated[i] = due;
            remaining -= due;
        }

        let pool = &candidates[cut..];
        debug!(settled = cut, pool = pool.len(), remaining = %remaining, "greedy pass done");

        if remaining.is_positive() && !pool.is_empty() {
            let dues: Vec<Money> = pool.iter().map(|&i| obligations[i].due_money()).collect();
            for (&i, share) in pool.iter().zip(distribute(remaining, &dues)) {
                allocated[i] = share;
            }
        }
    }

    let lines = obligations
        .iter()
        .zip(allocated)
        .map(|(obligation, amount)| AllocationLine {
            obligation_id: obligation.id.clone(),
            kind: obligation.kind,
            allocated: amount,
            settlement: settlement(amount, obligation.due_money()),
        })
        .collect();

    Ok(AllocationResult {
        lines,
        unallocated_remainder,
    })
}

fn validate(request: &AllocationRequest) -> Result<HashSet<&ObligationId>, AllocationError> {
    if request.obligations.is_empty() {
        return Err(AllocationError::NoObligationsSelected);
    }
    if !request.tendered.is_positive() && request.forced_full.is_empty() {
        return Err(AllocationError::EmptyPayment);
    }

    let mut ids = HashSet::with_capacity(request.obligations.len());
    for obligation in &request.obligations {
        if !ids.insert(&obligation.id) {
            return Err(AllocationError::DuplicateObligationId(
                obligation.id.clone(),
            ));
        }
    }

    let mut forced = HashSet::with_capacity(request.forced_full.len());
    for id in &request.forced_full {
        if !ids.contains(id) {
            return Err(AllocationError::UnknownForcedId(id.clone()));
        }
        forced.insert(id);
    }

    // Dues are positive, so every partial sum taken later stays below this one.
    request
        .obligations
        .iter()
        .try_fold(Money::ZERO, |total, o| total.checked_add(o.due_money()))
        .ok_or(AllocationError::AmountOverflow)?;
    Ok(forced)
}

/// Shares `amount` across `dues` in proportion, rounded to the minor unit.
///
/// `amount` must be below the smallest due. Rounding drift is folded back so the
/// shares add up to `amount` exactly: a surplus goes to the last share, a deficit
/// is taken from the last shares backwards.
fn distribute(amount: Money, dues: &[Money]) -> Vec<Money> {
    let total: Money = dues.iter().sum();
    let mut shares: Vec<Money> = dues
        .iter()
        .map(|&due| amount.share(due, total).min(due))
        .collect();

    let drift = amount - shares.iter().sum::<Money>();
    if drift >= Money::ZERO {
        if let Some(last) = shares.last_mut() {
            *last += drift;
        }
    } else {
        let mut deficit = Money::ZERO - drift;
        for share in shares.iter_mut().rev() {
            let taken = (*share).min(deficit);
            *share -= taken;
            deficit -= taken;
            if deficit == Money::ZERO {
                break;
            }
        }
    }
    shares
}

fn settlement(allocated: Money, due: Money) -> Settlement {
    if allocated >= due {
        Settlement::Full
    } else if allocated.is_positive() {
        Settlement::Partial
    } else {
        Settlement::Unpaid
    }
}
