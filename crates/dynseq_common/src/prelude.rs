pub use crate::collections::{
    DynamicSequence,
    SequenceError,
    ReserveStrategy,
    DoubleOrMinReserveStrategy,
    DEFAULT_CAPACITY,
};
pub use crate::dynseq;
