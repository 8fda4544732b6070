pub mod commit;
pub mod error;
pub mod interaction;
pub mod mode;
pub mod range;
pub mod state;
pub mod view;
