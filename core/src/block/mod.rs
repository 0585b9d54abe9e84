// Block request handling: scatter-gather requests to sector operations

mod dispatch;
mod error;
mod request;

pub use dispatch::{dispatch, segment_sectors, Completion};
pub use error::{DispatchError, DispatchResult};
pub use request::{BlockRequest, Direction, Segments};
