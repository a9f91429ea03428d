/// The tagged value stages exchange: either a successful payload or "no
/// result, but not a fault".
///
/// Faults never travel as data; they travel via the stage's completion
/// outcome. [`Envelope::Empty`] is the sentinel a transform emits when a
/// run produced nothing worth displaying, such as a cancelled reduction
/// or an empty input set, so the router can deliver it to the consumer
/// that handles those runs.
///
/// ```
/// use strata_flow::Envelope;
///
/// let full = Envelope::Payload(3);
/// assert_eq!(full.map(|n| n * 2), Envelope::Payload(6));
/// assert_eq!(Envelope::<i32>::Empty.payload(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T> {
    /// A successful payload.
    Payload(T),
    /// No result, but not a fault.
    Empty,
}

impl<T> Envelope<T> {
    /// Whether this envelope carries a payload.
    #[must_use]
    pub const fn has_payload(&self) -> bool {
        matches!(self, Self::Payload(_))
    }

    /// Whether this envelope is the empty sentinel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Extracts the payload, if any.
    pub fn payload(self) -> Option<T> {
        match self {
            Self::Payload(value) => Some(value),
            Self::Empty => None,
        }
    }

    /// Maps the payload, preserving an empty envelope.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Self::Payload(value) => Envelope::Payload(f(value)),
            Self::Empty => Envelope::Empty,
        }
    }
}
