//! Integration tests for design-tree

mod cli_contract;
mod properties;
mod scenarios;
mod session_commit;
mod sled_store;
mod support;
