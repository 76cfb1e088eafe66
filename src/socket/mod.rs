//! Connection setup.
//!
//! Every request gets its own connection, closed once the response has been
//! read:
//! - [`connectjob`]: DNS → TCP → TLS connection flow
//! - [`client`]: the connected socket type

pub mod client;
pub mod connectjob;
