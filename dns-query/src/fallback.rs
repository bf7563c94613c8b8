//! Platforms without a `resolv.conf` use the default configuration.

use crate::ResolvConf;

use std::io;

pub(super) async fn load_resolv_conf() -> io::Result<ResolvConf> {
    Ok(ResolvConf::default())
}
