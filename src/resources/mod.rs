//! Resource kinds: one module per kind.
//!
//! Each module holds:
//! 1. the authored shape (`Network`, `Instance`, ...) with its validation
//! 2. the execution-message item (`NetworkItem`, ...) and its `ResourceItem` impl
//! 3. `map` (definition → items) and `unmap` (items → definition)

pub mod datacenter;
pub mod ebs;
pub mod elb;
pub mod firewall;
pub mod instance;
pub mod nat;
pub mod network;
pub mod rds;
pub mod route53;
pub mod s3;
pub mod vpc;
