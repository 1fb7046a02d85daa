pub mod gps;
pub mod message;
pub mod track;
pub mod value;

pub use gps::*;
pub use message::*;
pub use track::*;
pub use value::*;
