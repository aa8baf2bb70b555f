//! The interactive shell and scriptable front end for the `mvcc` engine.
//!
//! ```doc
//! ❯ ./mvcc-cli
//!
//! Welcome to mvcc-cli.
//!
//! mvcc-cli > begin snapshot
//! 1
//!
//! mvcc-cli > set order_key xxx
//! xxx
//!
//! mvcc-cli > get order_key
//! xxx
//!
//! mvcc-cli > commit
//!
//! mvcc-cli > exit
//! Bye~
//! ```

pub mod config;
pub mod rusty;
pub mod session;
pub mod show;
pub mod trace;
