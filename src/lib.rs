//! Blogbar: aggregation of independent blogs with a moderated submission queue.

pub mod app_config;
pub mod approval;
pub mod asset;
pub mod blog;
pub mod db;
pub mod middleware;
pub mod orm;
pub mod site;
pub mod web;
