//! Command-line interface

mod args;

pub use args::{
    BootstrapArgs, Cli, Command, ComponentAddArgs, ComponentCommand, ComponentDeleteArgs,
    DescribeArgs, EnvAddArgs, EnvCommand, InitArgs, PushArgs,
};
