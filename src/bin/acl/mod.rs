pub mod commands;
pub mod formatters;


pub use commands::{execute_acl_command, AclCommands, CommandContext};
pub use formatters::print_error;
