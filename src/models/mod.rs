pub mod outcome;
pub mod params;
pub mod reference;
pub mod request;

pub use outcome::*;
pub use params::*;
pub use reference::*;
pub use request::*;
