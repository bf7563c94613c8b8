use dns_codec::{
    Describe, DomainName, Error, Flags, Ipv4Address, Message, Opcode, Question, RecordClass,
    RecordType, ResourceData, ResourceRecord, Value,
};

use rstest::rstest;

fn name(s: &str) -> DomainName {
    DomainName::new(s).unwrap()
}

fn record(owner: &str, ty: RecordType, ttl: i32, data: impl Into<ResourceData>) -> ResourceRecord {
    ResourceRecord::new(name(owner), ty, RecordClass::In, ttl, data).unwrap()
}

/// A response carrying every supported record type in some section.
fn full_response() -> Message {
    let mut flags = Flags::new();
    flags
        .set_is_request(false)
        .set_authoritative(true)
        .set_recursion_desired(true)
        .set_recursion_available(true);

    Message::new(
        0xCAFE,
        flags,
        vec![
            Question::new(name("www.google.com"), RecordType::A, RecordClass::In),
            Question::new(name("google.com"), RecordType::MX, RecordClass::In),
        ],
        vec![
            record("www.google.com", RecordType::CName, 300, name("www.l.google.com")),
            record("www.l.google.com", RecordType::A, 300, Ipv4Address::new(142, 250, 72, 196)),
            record("google.com", RecordType::MX, 600, name("smtp.google.com")),
        ],
        vec![
            record("google.com", RecordType::NS, 86400, name("ns1.google.com")),
            record("_sip._udp.google.com", RecordType::Srv, 60, name("sip.google.com")),
        ],
        vec![record(
            "196.72.250.142.in-addr.arpa",
            RecordType::Ptr,
            -1,
            name("lhr25s34-in-f4.1e100.net"),
        )],
    )
}

#[test]
fn full_message_round_trip() {
    let message = full_response();
    let bytes = message.to_vec().unwrap();
    assert_eq!(bytes.len(), message.space_needed());

    let decoded = Message::read(&bytes).unwrap();
    assert_eq!(decoded, message);
    assert_eq!(decoded.to_vec().unwrap(), bytes);
}

#[rstest]
#[case(RecordType::A)]
#[case(RecordType::NS)]
#[case(RecordType::CName)]
#[case(RecordType::Ptr)]
#[case(RecordType::MX)]
#[case(RecordType::Srv)]
#[case(RecordType::Ixfr)]
#[case(RecordType::Axfr)]
#[case(RecordType::All)]
fn query_round_trip(#[case] ty: RecordType) {
    for &recursion in &[true, false] {
        let query = Message::query(0x1234, "example.org", ty, recursion).unwrap();
        let mut buf = [0; 512];
        let len = query.write(&mut buf).unwrap();

        let decoded = Message::read(&buf[..len]).unwrap();
        assert_eq!(decoded, query);
        assert_eq!(decoded.questions()[0].ty(), ty);
        assert_eq!(decoded.flags().recursion_desired(), recursion);
    }
}

#[rstest]
#[case(Opcode::Query)]
#[case(Opcode::IQuery)]
#[case(Opcode::Status)]
fn opcode_round_trip(#[case] opcode: Opcode) {
    let mut message = Message::default();
    message.flags_mut().set_opcode(opcode);

    let decoded = Message::read(&message.to_vec().unwrap()).unwrap();
    assert_eq!(decoded.flags().opcode(), opcode);
}

#[test]
fn google_question_bytes() {
    let query = Message::query(0, "www.google.com", RecordType::A, false).unwrap();
    let bytes = query.to_vec().unwrap();

    assert_eq!(
        &bytes[12..],
        &[
            0x03, 0x77, 0x77, 0x77, 0x06, 0x67, 0x6F, 0x6F, 0x67, 0x6C, 0x65, 0x03, 0x63, 0x6F,
            0x6D, 0x00, 0x00, 0x01, 0x00, 0x01
        ]
    );
}

#[test]
fn request_flag_polarity() {
    let query = Message::query(1, "a.b", RecordType::A, true).unwrap();
    let bytes = query.to_vec().unwrap();
    assert_eq!(bytes[2] & 0x80, 0);
    assert!(Message::read(&bytes).unwrap().flags().is_request());

    let mut response = query;
    response.flags_mut().set_is_request(false);
    let bytes = response.to_vec().unwrap();
    assert_eq!(bytes[2] & 0x80, 0x80);
    assert!(!Message::read(&bytes).unwrap().flags().is_request());
}

/// A response to `www.example.com A`, written out by hand with compression.
fn compressed_response() -> Vec<u8> {
    let mut bytes = vec![
        0x00, 0x2A, 0x81, 0x80, 0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
    ];
    // Question at offset 12.
    bytes.extend_from_slice(b"\x03www\x07example\x03com\x00\x00\x05\x00\x01");
    // CNAME: owner points at the question name, data is "cdn" + pointer to "example.com".
    bytes.extend_from_slice(&[0xC0, 0x0C, 0x00, 0x05, 0x00, 0x01, 0x00, 0x00, 0x0E, 0x10]);
    bytes.extend_from_slice(&[0x00, 0x06, 0x03, b'c', b'd', b'n', 0xC0, 0x10]);
    // A: owner points at "cdn.example.com" in the previous record's data (offset 45).
    bytes.extend_from_slice(&[0xC0, 0x2D, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x3C]);
    bytes.extend_from_slice(&[0x00, 0x04, 93, 184, 216, 34]);
    bytes
}

#[test]
fn compressed_and_plain_names_decode_alike() {
    let compressed = compressed_response();
    let decoded = Message::read(&compressed).unwrap();

    let mut flags = Flags::standard_query();
    flags.set_is_request(false).set_recursion_available(true);
    let expected = Message::new(
        0x2A,
        flags,
        vec![Question::new(
            name("www.example.com"),
            RecordType::CName,
            RecordClass::In,
        )],
        vec![
            record("www.example.com", RecordType::CName, 3600, name("cdn.example.com")),
            record("cdn.example.com", RecordType::A, 60, Ipv4Address::new(93, 184, 216, 34)),
        ],
        vec![],
        vec![],
    );
    assert_eq!(decoded, expected);

    // Re-encoding writes the names out in full, which decodes to the same message.
    let plain = expected.to_vec().unwrap();
    assert!(plain.len() > compressed.len());
    assert_eq!(Message::read(&plain).unwrap(), decoded);
}

#[test]
fn data_length_matches_encoded_data() {
    let message = full_response();
    let bytes = message.to_vec().unwrap();
    let decoded = Message::read(&bytes).unwrap();

    for record in decoded
        .answers()
        .iter()
        .chain(decoded.authorities())
        .chain(decoded.additional())
    {
        let expected = match record.data() {
            ResourceData::Ipv4(_) => 4,
            ResourceData::Name(name) => name.labels().map(|l| l.len() + 1).sum::<usize>() + 1,
        };
        assert_eq!(usize::from(record.data_len()), expected);
    }
}

#[test]
fn trailing_bytes_are_ignored() {
    let query = Message::query(5, "example.net", RecordType::NS, true).unwrap();
    let mut bytes = query.to_vec().unwrap();
    bytes.extend_from_slice(&[0xDE, 0xAD]);
    assert_eq!(Message::read(&bytes).unwrap(), query);
}

#[rstest]
#[case::empty(0)]
#[case::inside_header(7)]
#[case::inside_name(16)]
#[case::inside_type(29)]
#[case::inside_record_header(40)]
#[case::inside_address(65)]
fn truncated_message(#[case] len: usize) {
    let bytes = compressed_response();
    assert!(matches!(
        Message::read(&bytes[..len]),
        Err(Error::NotEnoughReadBytes { .. })
    ));
}

#[test]
fn counts_larger_than_the_message() {
    // Claims 65535 answers but carries none.
    let bytes = [0, 1, 0x80, 0, 0, 0, 0xFF, 0xFF, 0, 0, 0, 0];
    assert!(matches!(
        Message::read(&bytes),
        Err(Error::NotEnoughReadBytes { position: 12, .. })
    ));
}

#[rstest]
#[case::record_type(&[0x00, 0x1C, 0x00, 0x01], "RecordType", 28)]
#[case::record_class(&[0x00, 0x01, 0x00, 0x03], "RecordClass", 3)]
fn unknown_codes(#[case] tail: &[u8], #[case] kind: &str, #[case] code: u16) {
    let mut bytes = vec![0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0];
    bytes.extend_from_slice(tail);

    match Message::read(&bytes) {
        Err(Error::InvalidCode(err)) => {
            assert_eq!(err.kind(), kind);
            assert_eq!(err.code(), code);
        }
        other => panic!("expected an invalid code, got {:?}", other),
    }
}

#[test]
fn unknown_opcode() {
    // Opcode 5 (UPDATE).
    let bytes = [0, 1, 5 << 3, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    assert!(matches!(Message::read(&bytes), Err(Error::InvalidCode(_))));
}

#[test]
fn pointer_loop_in_message() {
    let mut bytes = vec![0, 1, 0x80, 0, 0, 1, 0, 0, 0, 0, 0, 0];
    // A question whose name points at itself.
    bytes.extend_from_slice(&[0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01]);

    assert_eq!(
        Message::read(&bytes).unwrap_err(),
        Error::BadPointer {
            position: 12,
            target: 12,
        }
    );
}

#[test]
fn describes_decoded_response() {
    let decoded = Message::read(&compressed_response()).unwrap();
    let desc = decoded.describe();

    let header = match desc.get("Header") {
        Some(Value::Map(header)) => header,
        other => panic!("missing header: {:?}", other),
    };
    assert_eq!(header.get("Identifier"), Some(&Value::Integer(42)));
    assert_eq!(header.get("Number of Answers"), Some(&Value::Integer(2)));

    let answers = match desc.get("Answers") {
        Some(Value::Map(answers)) => answers,
        other => panic!("missing answers: {:?}", other),
    };
    let labels: Vec<_> = answers.iter().map(|(label, _)| label).collect();
    assert_eq!(labels, ["0", "1"]);
}
