pub mod kb;
pub mod memory;
pub mod tables;
pub mod wallet;
pub mod whoami;
