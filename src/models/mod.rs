pub mod disease;
pub mod history;
pub mod region;
pub mod severity;
pub mod substance;
pub mod treatment;

pub use disease::*;
pub use history::*;
pub use region::*;
pub use severity::*;
pub use substance::*;
pub use treatment::*;
