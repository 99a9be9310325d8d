use proptest::prelude::*;

use fleet_types::{Coinbase, ValidatorSet};

proptest! {
    /// Every member of a validator set is found by binary search, whatever the input order.
    #[test]
    fn validator_set_finds_all_members(members in prop::collection::vec("0x[0-9a-f]{1,8}", 0..32)) {
        let set: ValidatorSet = members.iter().map(|m| Coinbase::from(m.as_str())).collect();
        for m in &members {
            prop_assert!(set.contains(&Coinbase::from(m.as_str())));
        }
    }

    /// Validator sets are always sorted.
    #[test]
    fn validator_set_is_sorted(members in prop::collection::vec("0x[0-9a-f]{1,8}", 0..32)) {
        let set: ValidatorSet = members.iter().map(|m| Coinbase::from(m.as_str())).collect();
        prop_assert!(set.as_slice().windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(set.len(), members.len());
    }

    /// Addresses outside the set are never reported as members.
    #[test]
    fn validator_set_rejects_outsiders(
        members in prop::collection::vec("0x[0-9a-f]{1,8}", 0..16),
        outsider in "0x[g-z]{1,8}",
    ) {
        let set: ValidatorSet = members.iter().map(|m| Coinbase::from(m.as_str())).collect();
        prop_assert!(!set.contains(&Coinbase::from(outsider.as_str())));
    }
}
