//! Core traits for the dnslink publisher
//!
//! This module defines the capability interfaces the pipeline depends on.
//!
//! - [`DnsProvider`]: List, create and edit TXT records via provider APIs
//! - [`CommandRunner`]: Run external programs and capture their output

pub mod command_runner;
pub mod dns_provider;

pub use command_runner::{CommandOutput, CommandRunner};
pub use dns_provider::{DnsProvider, DnsRecord, TXT};
