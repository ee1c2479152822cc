pub mod chart;
pub mod response;
pub mod stock;
pub mod ui;

pub use chart::*;
pub use response::*;
pub use stock::*;
pub use ui::*;
