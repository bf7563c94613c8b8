//! Send a query and print the request and response as trees.
//!
//! ```text
//! cargo run --example lookup -- www.google.com --type MX
//! ```

use clap::Parser;
use dns_query::dns_codec::{Describe, Description, RecordType, Value};
use dns_query::{QueryOptions, ResolvConf, DNS_PORT};

use std::net::{IpAddr, SocketAddr};
use std::process;
use std::time::Duration;

#[derive(Parser)]
struct Args {
    /// The name to look up.
    name: String,

    /// The record type to ask for.
    #[arg(short = 't', long = "type", default_value = "A")]
    ty: RecordType,

    /// The name server to ask, instead of the system's.
    #[arg(short, long)]
    server: Option<IpAddr>,

    /// Seconds to wait for the response.
    #[arg(long)]
    timeout: Option<u64>,

    /// Ask the server not to recurse.
    #[arg(long)]
    no_recursion: bool,
}

fn print_tree(desc: &Description, depth: usize) {
    for (label, value) in desc {
        let indent = depth * 2;
        match value {
            Value::Map(inner) => {
                println!("{:indent$}{}", "", label, indent = indent);
                print_tree(inner, depth + 1);
            }
            Value::Bool(b) => println!("{:indent$}{}: {}", "", label, b, indent = indent),
            Value::Integer(i) => println!("{:indent$}{}: {}", "", label, i, indent = indent),
            Value::Text(t) => println!("{:indent$}{}: {}", "", label, t, indent = indent),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let exchange = async_io::block_on(async {
        let conf = ResolvConf::load().await?;
        let mut options = QueryOptions::from(&conf);
        if let Some(server) = args.server {
            options = options.server(SocketAddr::new(server, DNS_PORT));
        }
        if let Some(timeout) = args.timeout {
            options = options.timeout(Duration::from_secs(timeout));
        }

        let request = dns_query::dns_codec::Message::query(
            fastrand::u16(..),
            &args.name,
            args.ty,
            !args.no_recursion,
        )
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

        dns_query::query_with(request, &options).await
    });

    let exchange = match exchange {
        Ok(exchange) => exchange,
        Err(err) => {
            log::error!("query for {} failed: {}", args.name, err);
            process::exit(1);
        }
    };

    println!("Request");
    print_tree(&exchange.request().describe(), 1);
    println!();
    println!("Response");
    print_tree(&exchange.response().describe(), 1);
}
