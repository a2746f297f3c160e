pub mod create;
pub mod etcd;
pub mod flags;
pub mod lifecycle;
