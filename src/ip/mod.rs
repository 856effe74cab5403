mod endpoint;
mod external;
mod fallback;
mod validate;

pub use endpoint::{
    default_ipv4_endpoints, default_ipv6_endpoints, AddressFamily, Endpoint, ResponseFormat,
    IP_FIELD,
};
pub use external::{HttpLookup, IpLookup, DEFAULT_TIMEOUT, USER_AGENT};
pub use fallback::resolve_first;
pub use validate::{is_ipv4, is_ipv6};
