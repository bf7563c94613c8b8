//! Send a DNS query over UDP and decode the response.
//!
//! This crate is the transport half of [`dns-codec`]. A query is encoded into a single
//! datagram, sent to one name server, and the first response carrying the same
//! identifier is decoded. The name server comes from `/etc/resolv.conf` on Unix and
//! defaults to `8.8.4.4` elsewhere; it can also be chosen explicitly with
//! [`QueryOptions`].
//!
//! The futures returned here are runtime-agnostic. They are driven by [`async-io`],
//! so any executor, including [`async_io::block_on`], can run them.
//!
//! [`dns-codec`]: https://crates.io/crates/dns-codec
//! [`async-io`]: https://crates.io/crates/async-io

#![forbid(
    unsafe_code,
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    future_incompatible
)]

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod unix;
        use unix as sys;
    } else {
        mod fallback;
        use fallback as sys;
    }
}

mod conf;

pub use conf::{QueryOptions, ResolvConf, DEFAULT_SERVER, DNS_PORT};
pub use dns_codec;

use async_io::{Async, Timer};
use dns_codec::{Header, Message, RecordType};
use futures_lite::future;

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

/// The largest datagram a response may take.
pub const MAX_DATAGRAM_LEN: usize = 512;

/// A request and the response it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    request: Message,
    response: Message,
}

impl Exchange {
    /// Get the request that was sent.
    pub fn request(&self) -> &Message {
        &self.request
    }

    /// Get the response that was received.
    pub fn response(&self) -> &Message {
        &self.response
    }

    /// Split this exchange into the request and the response.
    pub fn into_parts(self) -> (Message, Message) {
        (self.request, self.response)
    }
}

/// Ask the configured name server a question about `name` in class `IN`.
///
/// The request gets a random identifier. See [`query_with`] for the exchange itself.
///
/// # Errors
///
/// Fails with [`io::ErrorKind::InvalidInput`] if `name` is not a valid domain name,
/// and otherwise as [`query_with`] does.
pub async fn query(name: &str, ty: RecordType, recursion_desired: bool) -> io::Result<Exchange> {
    let conf = ResolvConf::load().await?;

    let id = fastrand::u16(..);
    let request = Message::query(id, name, ty, recursion_desired)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    query_with(request, &QueryOptions::from(&conf)).await
}

/// Send `request` to the server in `options` and wait for its response.
///
/// The request is sent once, then datagrams are read until the timeout expires.
/// Datagrams from other addresses, datagrams too short for a header and responses
/// with a different identifier are skipped without decoding the rest of them. The
/// response itself is not checked beyond its identifier; a truncated or failed
/// response is returned as is.
///
/// # Errors
///
/// - [`io::ErrorKind::InvalidInput`] if the request cannot be encoded.
/// - [`io::ErrorKind::InvalidData`] if the response with the right identifier cannot
///   be decoded, or if only skipped datagrams arrived.
/// - [`io::ErrorKind::TimedOut`] if no response arrived in time.
/// - Any error from the socket itself.
pub async fn query_with(request: Message, options: &QueryOptions) -> io::Result<Exchange> {
    /// The result of waiting for a packet on a fixed timeout.
    enum WaitResult {
        /// The packet was received.
        Packet { len: usize, from: SocketAddr },
        /// The timeout expired.
        TimedOut,
    }

    let id = request.id();

    // Serialize the request. Use the stack if we can, but switch to the heap if it's
    // not enough.
    let mut stack_buffer = [0; MAX_DATAGRAM_LEN];
    let mut heap_buffer = None;
    let needed = request.space_needed();

    let out = if needed > stack_buffer.len() {
        heap_buffer.insert(vec![0; needed]).as_mut_slice()
    } else {
        &mut stack_buffer
    };

    let len = request
        .write(out)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let out = &out[..len];

    // Bind to the unspecified address of the server's family.
    let server = options.server_addr();
    let local: SocketAddr = if server.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = Async::<UdpSocket>::bind(local)?;

    log::debug!("sending query {:#06x} ({} bytes) to {}", id, len, server);
    socket.send_to(out, server).await?;

    // Keep reading until the timer runs out or the response arrives.
    let mut buf = [0; MAX_DATAGRAM_LEN];
    let mut timeout = Timer::after(options.timeout_duration());
    let mut mismatched = false;

    loop {
        let result = future::or(
            async {
                let (len, from) = socket.recv_from(&mut buf).await?;
                io::Result::Ok(WaitResult::Packet { len, from })
            },
            async {
                (&mut timeout).await;
                io::Result::Ok(WaitResult::TimedOut)
            },
        )
        .await?;

        let (len, from) = match result {
            WaitResult::Packet { len, from } => (len, from),
            WaitResult::TimedOut => break,
        };

        if from != server {
            log::warn!("ignoring {} byte datagram from {}", len, from);
            continue;
        }

        log::debug!("received {} bytes from {}", len, from);

        // Check the ID before decoding the rest; stale replies may not decode at all.
        match Header::read(&buf[..len]) {
            Ok(header) if header.id() == id => {}
            Ok(header) => {
                log::warn!("expected response {:#06x}, got {:#06x}", id, header.id());
                mismatched = true;
                continue;
            }
            Err(err) => {
                log::warn!("ignoring datagram without a valid header: {}", err);
                mismatched = true;
                continue;
            }
        }

        let response = Message::read(&buf[..len])
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

        return Ok(Exchange { request, response });
    }

    log::debug!("query {:#06x} to {} timed out", id, server);
    if mismatched {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "response identifier did not match the query",
        ))
    } else {
        Err(io::Error::new(
            io::ErrorKind::TimedOut,
            "no response from the name server",
        ))
    }
}

fn _assert_threadsafe() {
    fn _assertion<F: Send + Sync>(_: F) {}
    _assertion(query("foobar", RecordType::A, true));
}
