//! lookup.rs example adapted into a test.
//!
//! Needs network access and a working name server, so it is ignored by default.

use dns_query::dns_codec::{RecordType, ResourceData};

#[test]
#[ignore = "needs network access"]
fn google_lookup() {
    async_io::block_on(async {
        let exchange = dns_query::query("google.com", RecordType::A, true)
            .await
            .unwrap();

        let response = exchange.response();
        assert!(!response.flags().is_request());
        assert_eq!(response.id(), exchange.request().id());
        assert!(response
            .answers()
            .iter()
            .any(|answer| matches!(answer.data(), ResourceData::Ipv4(_))));
    });
}
