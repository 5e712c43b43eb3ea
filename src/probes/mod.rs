//! Independent probes feeding the authority audit.
//!
//! Every probe folds its own failures into a default result and logs a
//! warning, so a single unavailable provider never fails an audit.

pub mod content;
pub mod domain_age;
pub mod keywords;
pub mod pagespeed;
pub mod security;
pub mod technical;

pub use content::fetch_content;
pub use domain_age::RdapClient;
pub use keywords::SerpClient;
pub use pagespeed::PageSpeedClient;
pub use security::fetch_security;
pub use technical::TechnicalProbe;
