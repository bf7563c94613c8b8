//! Resolver configuration, in the format of `resolv.conf(5)`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::IntErrorKind;
use std::time::Duration;

/// The server used when no configuration names one.
pub const DEFAULT_SERVER: IpAddr = IpAddr::V4(Ipv4Addr::new(8, 8, 4, 4));

/// The DNS port.
pub const DNS_PORT: u16 = 53;

/// The longest timeout, in seconds, that `options timeout:` may ask for.
const MAX_TIMEOUT: u8 = 30;

/// Structural form of `resolv.conf`.
///
/// Only the settings that affect a single UDP exchange are kept: the name servers
/// and the receive timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvConf {
    /// The list of name servers, in file order.
    name_servers: Vec<IpAddr>,

    /// Maximum timeout in seconds.
    timeout: u8,
}

impl Default for ResolvConf {
    fn default() -> Self {
        Self {
            name_servers: vec![],
            timeout: 5,
        }
    }
}

impl ResolvConf {
    /// Load the configuration of this system.
    ///
    /// On Unix this reads `/etc/resolv.conf`; a missing file gives the defaults. Other
    /// platforms always use the defaults.
    pub async fn load() -> std::io::Result<Self> {
        crate::sys::load_resolv_conf().await
    }

    /// Parse the contents of a `resolv.conf` file.
    ///
    /// Lines that are not understood are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut config = Self::default();
        for line in contents.lines() {
            config.parse_line(line);
        }
        config
    }

    /// Apply a single line of a `resolv.conf` file.
    pub(crate) fn parse_line(&mut self, line: &str) {
        // If the line has a comment, remove it.
        let line = match memchr::memchr2(b'#', b';', line.as_bytes()) {
            Some(n) => &line[..n],
            None => line,
        };

        let mut words = line.split_whitespace();
        match words.next() {
            Some("nameserver") => match words.next().map(str::parse) {
                Some(Ok(ip_addr)) => self.name_servers.push(ip_addr),
                _ => log::trace!("skipping bad nameserver line: {:?}", line),
            },
            Some("options") => {
                for option in words {
                    if let Some(timeout) = option.strip_prefix("timeout:") {
                        // Clamp to 1..=30 seconds, as libc does.
                        match timeout.parse::<u8>() {
                            Ok(timeout) => self.timeout = timeout.clamp(1, MAX_TIMEOUT),
                            Err(err) if *err.kind() == IntErrorKind::PosOverflow => {
                                self.timeout = MAX_TIMEOUT;
                            }
                            Err(_) => log::trace!("skipping bad timeout: {:?}", option),
                        }
                    } else {
                        log::trace!("skipping unused option: {:?}", option);
                    }
                }
            }
            Some(_) => log::trace!("skipping line: {:?}", line),
            None => {}
        }
    }

    /// Get every configured name server.
    pub fn name_servers(&self) -> &[IpAddr] {
        &self.name_servers
    }

    /// Get the name server queries are sent to: the first configured one, or
    /// `8.8.4.4` if there is none.
    pub fn name_server(&self) -> IpAddr {
        self.name_servers
            .first()
            .copied()
            .unwrap_or(DEFAULT_SERVER)
    }

    /// Get the time to wait for a response.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.into())
    }
}

/// Options for a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    server: SocketAddr,
    timeout: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::from(&ResolvConf::default())
    }
}

impl From<&ResolvConf> for QueryOptions {
    fn from(conf: &ResolvConf) -> Self {
        Self {
            server: SocketAddr::new(conf.name_server(), DNS_PORT),
            timeout: conf.timeout(),
        }
    }
}

impl QueryOptions {
    /// Create the default options: `8.8.4.4:53` and five seconds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Send the query to this server.
    pub fn server(mut self, server: impl Into<SocketAddr>) -> Self {
        self.server = server.into();
        self
    }

    /// Wait this long for the response.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the server address.
    pub fn server_addr(&self) -> SocketAddr {
        self.server
    }

    /// Get the time to wait for the response.
    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }
}
