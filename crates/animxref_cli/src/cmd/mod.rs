/// Object catalog listing command.
pub mod catalog;
/// Survey configuration file handling.
pub mod config;
/// Single container decode command.
pub mod container;
/// Map placement listing command.
pub mod placements;
/// Full cross-reference survey command.
pub mod survey;

#[cfg(test)]
mod test_support;
mod util;
