pub mod add;
pub mod audit_cmd;
pub mod completions;
pub mod delete;
pub mod init;
pub mod list;
pub mod open;
pub mod reveal;
pub mod status;
pub mod version;
