pub mod analyzer;
pub mod connect;
pub mod observer;
pub mod prober;
