pub mod bridge;
pub mod keyring;
pub mod model;
