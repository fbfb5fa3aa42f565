pub mod export;
pub mod health_check;
pub mod subscribe;
pub mod unsubscribe;

pub use export::*;
pub use health_check::*;
pub use subscribe::*;
pub use unsubscribe::*;
