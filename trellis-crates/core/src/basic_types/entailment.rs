/// Whether a constraint is guaranteed to hold, guaranteed to be violated, or neither, given the
/// current domains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Entailment {
    True,
    False,
    #[default]
    Undefined,
}

impl Entailment {
    pub fn is_true(self) -> bool {
        self == Entailment::True
    }

    pub fn is_false(self) -> bool {
        self == Entailment::False
    }
}
