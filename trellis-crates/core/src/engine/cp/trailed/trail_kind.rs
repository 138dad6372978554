use std::fmt::Display;

use enum_map::Enum;

/// The kinds of backtrackable cells, each of which is recorded on its own trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
pub enum TrailKind {
    Int,
    Bool,
    Long,
    Double,
    IntVector,
    DoubleVector,
    Operation,
}

impl Display for TrailKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrailKind::Int => write!(f, "int"),
            TrailKind::Bool => write!(f, "bool"),
            TrailKind::Long => write!(f, "long"),
            TrailKind::Double => write!(f, "double"),
            TrailKind::IntVector => write!(f, "int vector"),
            TrailKind::DoubleVector => write!(f, "double vector"),
            TrailKind::Operation => write!(f, "operation"),
        }
    }
}
