pub mod ball;
pub mod driver;
pub mod guard;
pub mod impact;
pub mod input;
pub mod launcher;
pub mod movement;

pub use ball::*;
pub use driver::*;
pub use guard::*;
pub use impact::*;
pub use input::*;
pub use launcher::*;
pub use movement::*;
