// Command modules for the minter CLI

pub mod init_config;
pub mod launch;
pub mod utils;
