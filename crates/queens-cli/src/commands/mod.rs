pub mod cluster;
pub mod master;
pub mod solve;
pub mod worker;
