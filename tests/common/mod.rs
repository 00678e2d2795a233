
pub(crate) use cli_utils::*;
