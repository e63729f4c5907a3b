pub mod presenter;

pub use presenter::{JsonPresenter, TextPresenter};
