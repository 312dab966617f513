pub mod response;
pub mod stock;
pub mod view;

pub use response::*;
pub use stock::*;
pub use view::*;
