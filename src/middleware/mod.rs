mod ip_ban;

pub use ip_ban::{extract_client_ip, IpBan, IpBanMiddleware};
