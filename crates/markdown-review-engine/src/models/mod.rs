pub mod change;
pub mod element;
pub mod operation;

pub use change::*;
pub use element::*;
pub use operation::*;
