pub mod credential;
pub mod paths;
pub mod status;

pub use credential::Credential;
pub use status::Derived;
