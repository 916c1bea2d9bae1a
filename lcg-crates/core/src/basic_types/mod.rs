mod channel_info;
mod constraint_operation_error;
mod hash_structures;
mod lbool;
mod literal;
mod trail;

pub use channel_info::ChannelInfo;
pub use channel_info::ChannelKind;
pub use channel_info::ValueKind;
pub use constraint_operation_error::ConstraintOperationError;
pub(crate) use hash_structures::HashMap;
pub(crate) use hash_structures::HashSet;
pub use lbool::Lbool;
pub use literal::BooleanVariable;
pub use literal::Literal;
pub(crate) use trail::Trail;
