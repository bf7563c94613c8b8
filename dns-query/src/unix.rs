//! Loading the resolver configuration on Unix systems.

use crate::ResolvConf;

use async_fs::File;
use futures_lite::{io::BufReader, prelude::*};

use std::io;

const RESOLV_CONF: &str = "/etc/resolv.conf";

/// Load the current configuration from /etc/resolv.conf.
pub(super) async fn load_resolv_conf() -> io::Result<ResolvConf> {
    // Open the file, falling back to the defaults if there isn't one.
    let file = match File::open(RESOLV_CONF).await {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::debug!("{} not found, using the default configuration", RESOLV_CONF);
            return Ok(ResolvConf::default());
        }
        Err(err) => return Err(err),
    };
    let mut file = BufReader::new(file);

    let mut config = ResolvConf::default();
    let mut buf = String::new();

    loop {
        // Read a line.
        buf.clear();
        let n = file.read_line(&mut buf).await?;

        // If we read nothing, we reached the end of the file.
        if n == 0 {
            break;
        }

        config.parse_line(buf.trim_end_matches('\n'));
    }

    log::debug!("loaded {}: {:?}", RESOLV_CONF, config);
    Ok(config)
}
