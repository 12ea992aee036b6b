use super::*;

#[test]
fn site_config_maps_flags_onto_config_keys() {
    let cli = Cli::try_parse_from([
        "rfd-cli",
        "--chat-endpoints",
        "https://a.test/chat,https://b.test/chat",
        "--contact-endpoint",
        "https://c.test/contact",
        "--timeout-ms",
        "2500",
        "extract",
    ])
    .unwrap();
    let config = cli.site_config().unwrap();
    assert_eq!(config.chat_endpoints, vec!["https://a.test/chat".to_owned(), "https://b.test/chat".to_owned()]);
    assert_eq!(config.contact_endpoint, "https://c.test/contact");
    assert_eq!(config.request_timeout_ms, 2500);
}

#[test]
fn site_config_rejects_bad_timeout() {
    let cli = Cli::try_parse_from(["rfd-cli", "--timeout-ms", "later", "extract"]).unwrap();
    assert!(matches!(cli.site_config(), Err(ConfigError::InvalidValue { key: "timeoutMs", .. })));
}

#[test]
fn chat_subcommand_parses_message_and_session() {
    let cli = Cli::try_parse_from(["rfd-cli", "chat", "ciao", "--session-id", "s-1"]).unwrap();
    match cli.command {
        Command::Chat { message, session_id } => {
            assert_eq!(message, "ciao");
            assert_eq!(session_id.as_deref(), Some("s-1"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn contact_subcommand_requires_all_fields() {
    assert!(Cli::try_parse_from(["rfd-cli", "contact", "--nome", "Mario"]).is_err());
}

#[test]
fn extract_reads_json_payloads() {
    let input = br#"[{"output":"{\"reply\":\"ciao\"}"}]"#;
    assert_eq!(extract_from(&input[..]).unwrap(), "ciao");
}

#[test]
fn extract_passes_plain_text_through() {
    assert_eq!(extract_from("risposta semplice\n".as_bytes()).unwrap(), "risposta semplice");
}
