//! Core mapping logic — definition and message types, validation, mapping,
//! merge, change detection and planning.

pub mod cidr;
pub mod definition;
pub mod detector;
pub mod mapper;
pub mod merge;
pub mod message;
pub mod parser;
pub mod placeholder;
pub mod planner;
pub mod resolver;
pub mod validator;
