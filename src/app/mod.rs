mod root;
mod state;

pub(crate) use state::Tab;

pub use root::App;
