/*!
# CLI module
Command line interface functionality that is specific to aaflip.
*/

/// The main CLI module that contains the top-level CLI parser and help text
pub mod core;
/// The normalize CLI subcommand
pub mod normalize;
