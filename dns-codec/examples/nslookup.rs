//! Blocking `nslookup`, using `dns-codec` and a plain UDP socket.
//!
//! Usage: `nslookup <name> [type] [server]`. The server defaults to 8.8.4.4.

use std::env;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::process;
use std::time::Duration;

use dns_codec::{Message, RecordType, ResourceData};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The first argument is the name to lookup.
    let mut args = env::args();
    let program_name = args.next().unwrap_or_else(|| "nslookup".into());
    let name = match args.next() {
        Some(name) => name,
        None => {
            eprintln!("Usage: {} <name> [type] [server]", &program_name);
            process::exit(1);
        }
    };

    let ty = match args.next() {
        Some(ty) => ty.parse::<RecordType>()?,
        None => RecordType::A,
    };

    let nameserver = match args.next() {
        Some(ns) => ns.parse::<IpAddr>()?,
        None => IpAddr::V4(Ipv4Addr::new(8, 8, 4, 4)),
    };

    println!("Server: {}", nameserver);

    // Create the message we need to send.
    let message = Message::query(0xFEE7, &name, ty, true)?;
    let buffer = message.to_vec()?;

    // Send the packet to our nameserver over UDP.
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.set_read_timeout(Some(Duration::from_secs(5)))?;
    socket.send_to(&buffer, (nameserver, 53))?;

    // Wait for a response.
    let mut buffer = [0; 512];
    let len = socket.recv(&mut buffer)?;

    // Parse the response.
    let response = Message::read(&buffer[..len])?;
    if response.id() != message.id() {
        return Err("response identifier does not match the query".into());
    }

    println!(";; Got answer: {:?}", response.flags());

    for answer in response.answers() {
        match answer.data() {
            ResourceData::Ipv4(ip) => println!("{} has address {}", answer.name(), ip),
            ResourceData::Name(target) => println!(
                "{} {} {}",
                answer.name(),
                answer.ty().mnemonic(),
                target
            ),
        }
    }

    Ok(())
}
