pub mod completion;
pub mod config;
pub mod issue;
pub mod oauth;
pub mod profile;
pub mod proxy;
pub mod register;
pub mod session;
pub mod theme;
pub mod version;
