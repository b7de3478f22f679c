use crate::error::DispatchError;

pub type DispatchResult<T> = Result<T, DispatchError>;
