pub mod approvals;
pub mod error;
pub mod feed;
pub mod index;

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Route resolution stops at the first match.
    index::configure(conf);
    approvals::configure(conf);
    feed::configure(conf);
}
