//! Identity generators used by stores to assign final identities.

use crate::entity::FieldValue;
use uuid::Uuid;

/// Produces fresh identities for newly persisted entities.
pub trait IdGenerator<Id> {
    /// Returns the next identity.
    fn next_id(&mut self) -> Id;
}

/// Monotonic counter, the in-memory analogue of a database sequence.
///
/// Identities are never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    next: u64,
}

impl Sequence {
    /// Creates a sequence whose first identity is `start`.
    #[must_use]
    pub const fn starting_at(start: u64) -> Self {
        Self { next: start }
    }

    /// Returns the value the next call will produce.
    #[must_use]
    pub const fn peek(&self) -> u64 {
        self.next
    }

    fn advance(&mut self) -> u64 {
        let current = self.next;
        self.next = self.next.saturating_add(1);
        current
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator<u64> for Sequence {
    fn next_id(&mut self) -> u64 {
        self.advance()
    }
}

impl IdGenerator<i64> for Sequence {
    fn next_id(&mut self) -> i64 {
        i64::try_from(self.advance()).unwrap_or(i64::MAX)
    }
}

impl IdGenerator<FieldValue> for Sequence {
    fn next_id(&mut self) -> FieldValue {
        FieldValue::Integer(IdGenerator::<i64>::next_id(self))
    }
}

/// Random v4 UUID identities.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator<Uuid> for UuidGenerator {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

impl IdGenerator<FieldValue> for UuidGenerator {
    fn next_id(&mut self) -> FieldValue {
        FieldValue::Uuid(Uuid::new_v4())
    }
}

/// Adapts a closure into a generator.
#[derive(Debug, Clone)]
pub struct FromFn<F>(pub F);

impl<Id, F> IdGenerator<Id> for FromFn<F>
where
    F: FnMut() -> Id,
{
    fn next_id(&mut self) -> Id {
        (self.0)()
    }
}
