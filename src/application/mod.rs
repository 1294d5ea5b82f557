// Application layer: forms, list/overlay views and the tracker that ties them to
// the ledger. Every client (the terminal session, tests) goes through `Tracker`.

pub mod error;
pub mod form;
pub mod service;
pub mod settings;
pub mod view;

pub use error::*;
pub use form::*;
pub use service::*;
pub use settings::*;
pub use view::*;
