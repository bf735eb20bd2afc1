mod dump;
mod error;
mod impls;
mod iter;
pub mod skip_list;

pub use dump::parse_record;
pub use error::OrdoSkipListError;
pub use iter::Iter;

pub type Result<T> = std::result::Result<T, OrdoSkipListError>;
