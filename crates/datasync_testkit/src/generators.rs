//! Property-based test generators using proptest.
//!
//! Generated entities never carry an identity; stores assign them.

use crate::fixtures::SimpleEntity;
use proptest::prelude::*;

/// Strategy for generating short printable strings.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ,.!?-]{0,24}").expect("Invalid regex")
}

/// Strategy for generating timestamps in milliseconds, before and after
/// the epoch.
pub fn millis_strategy() -> impl Strategy<Value = i64> {
    -4_000_000_000_000i64..4_000_000_000_000i64
}

/// Strategy for generating entities without identity.
pub fn simple_entity_strategy() -> impl Strategy<Value = SimpleEntity> {
    (text_strategy(), millis_strategy(), any::<i32>())
        .prop_map(|(string, date, integer)| SimpleEntity::new(string, date, integer))
}

/// Strategy for generating a batch of up to `max` entities.
pub fn simple_entities_strategy(max: usize) -> impl Strategy<Value = Vec<SimpleEntity>> {
    prop::collection::vec(simple_entity_strategy(), 0..=max)
}

/// Strategy for generating an optional provisional identity.
pub fn provisional_id_strategy() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(1_000i64..1_000_000)
}
