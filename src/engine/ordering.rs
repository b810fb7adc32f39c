use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{AjoError, AjoResult};
use crate::model::{Account, Id, Membership};

/// Assigns `final_order` to every membership of a pod, exactly once.
///
/// Members are taken in join order. A sequential pod keeps that order; a
/// randomized pod applies a Fisher-Yates shuffle driven by the caller's RNG.
/// Either way the assigned values are a bijection over 1..=N.
pub fn finalize_payout_order<R: Rng>(
    memberships: &mut [Membership],
    randomize: bool,
    rng: &mut R,
) -> AjoResult<()> {
    if memberships.iter().any(|m| m.final_order.is_some()) {
        return Err(AjoError::OrderAlreadyFinalized);
    }

    memberships.sort_by_key(|m| m.join_order);

    let mut positions: Vec<i32> = (1..=memberships.len() as i32).collect();
    if randomize {
        positions.shuffle(rng);
    }

    for (membership, position) in memberships.iter_mut().zip(positions) {
        membership.final_order = Some(position);
    }

    Ok(())
}

/// Who collects before and after the requesting account.
#[derive(Debug, Clone)]
pub struct QueueView {
    pub my_position: i32,
    pub ahead_of_you: Vec<Membership>,
    pub behind_you: Vec<Membership>,
}

/// The requesting account's place in the payout queue. None before lock —
/// the order is not yet meaningful — and None for non-members.
pub fn queue_position(
    memberships: &[Membership],
    account_id: Id<Account>,
) -> Option<QueueView> {
    let mine = memberships
        .iter()
        .find(|m| m.account_id == Some(account_id))?;
    let my_position = mine.final_order?;

    let mut ahead_of_you: Vec<Membership> = memberships
        .iter()
        .filter(|m| m.final_order.is_some_and(|o| o < my_position))
        .cloned()
        .collect();
    ahead_of_you.sort_by_key(|m| m.final_order);

    let mut behind_you: Vec<Membership> = memberships
        .iter()
        .filter(|m| m.final_order.is_some_and(|o| o > my_position))
        .cloned()
        .collect();
    behind_you.sort_by_key(|m| m.final_order);

    Some(QueueView {
        my_position,
        ahead_of_you,
        behind_you,
    })
}
