use exchange_bounce::{Engine, Message, ScanError};

fn scan(raw: &str) -> Result<exchange_bounce::BounceReport, ScanError> {
    let message = Message::parse(raw)?;
    Engine::new().scan(&message)
}

#[test]
fn test_unknown_recipient_with_original_message() {
    let report = scan(include_str!("../set-of-emails/exchange-01.eml")).unwrap();

    assert_eq!(report.ds.len(), 1);
    let ds = &report.ds[0];
    assert_eq!(ds.recipient, "kijitora@example.co.jp");
    assert_eq!(ds.reason, "userunknown");
    assert_eq!(ds.status, "5.0.911");
    assert_eq!(ds.action, "failed");
    assert_eq!(ds.spec, "SMTP");
    assert_eq!(ds.diagnosis, "Unknown Recipient");
    assert_eq!(ds.agent, "Exchange");
    assert_eq!(ds.lhost, "exchange.example.co.jp");
    assert_eq!(ds.rhost, "exchange.example.co.jp");

    assert_eq!(
        report.rfc822,
        "Message-ID: <000001c01abc$deadbeef$0a00000a@example.jp>\n\
         From: Shironeko <shironeko@example.jp>\n\
         To: kijitora@example.co.jp\n\
         Subject: test\n\
         Date: Thu, 29 Apr 2007 16:51:43 -0500\n"
    );
}

#[test]
fn test_two_recipients_and_synthesized_header() {
    let report = scan(include_str!("../set-of-emails/exchange-02.eml")).unwrap();

    let recipients: Vec<&str> = report.ds.iter().map(|d| d.recipient.as_str()).collect();
    assert_eq!(recipients, ["kijitora@example.org", "mikeneko@example.org"]);

    assert_eq!(report.ds[0].reason, "");
    assert_eq!(report.ds[0].status, "");
    assert_eq!(report.ds[0].action, "");

    assert_eq!(report.ds[1].reason, "filtered");
    assert_eq!(report.ds[1].status, "5.0.910");
    assert_eq!(report.ds[1].diagnosis, "Ambiguous Recipient");

    for ds in &report.ds {
        assert_eq!(ds.lhost, "relay.example.org");
        assert_eq!(ds.rhost, "mx.example.jp");
        assert_eq!(ds.agent, "Exchange");
    }

    assert_eq!(
        report.rfc822,
        "From: shironeko@example.jp\nDate: Thu, 29 Apr 2010 18:14:35 +0000\nSubject: test\n"
    );
}

#[test]
fn test_smtp_form_without_code() {
    let report = scan(include_str!("../set-of-emails/exchange-03.eml")).unwrap();

    assert_eq!(report.ds.len(), 1);
    let ds = &report.ds[0];
    assert_eq!(ds.recipient, "kijitora@example.com");
    assert_eq!(ds.reason, "");
    assert_eq!(ds.spec, "SMTP");
    assert!(ds
        .diagnosis
        .ends_with("recipient's mailbox is temporarily unavailable"));
    assert_eq!(ds.lhost, "exchange.example.net");
    assert_eq!(ds.rhost, "exchange.example.net");

    assert_eq!(
        report.rfc822,
        "From: Kijitora Cat\nDate: 1/4/99 9:19:59 AM\nSubject: meeting\n"
    );
}

#[test]
fn test_other_dialect_is_not_recognized() {
    assert_eq!(
        scan(include_str!("../set-of-emails/not-exchange.eml")),
        Err(ScanError::NotRecognized)
    );
}

#[test]
fn test_report_serializes() {
    let report = scan(include_str!("../set-of-emails/exchange-01.eml")).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["ds"][0]["recipient"], "kijitora@example.co.jp");
    assert_eq!(json["ds"][0]["reason"], "userunknown");
    assert!(json["rfc822"].as_str().unwrap().contains("Subject: test"));
}
