pub mod approval_logs;
pub mod blogs;
pub mod posts;
