use wifi_qr_generator::{Security, WifiCredential};

#[test]
fn secured_networks_carry_type_and_password() {
    let cases = [
        ("HomeNet", "secret123", Security::Wpa, false),
        ("Office-5G", "correct horse", Security::Wpa, true),
        ("Legacy", "abcde", Security::Wep, false),
        ("Cellar", "12345678", Security::Wep, true),
    ];
    for (ssid, password, security, hidden) in cases {
        let payload =
            WifiCredential::new(ssid, Some(password.to_string()), security).hidden(hidden).payload();
        assert!(payload.starts_with("WIFI:"), "{payload}");
        assert!(payload.ends_with(";;"), "{payload}");
        assert!(payload.contains(&format!("S:{ssid};")), "{payload}");
        assert!(payload.contains(&format!("T:{security};")), "{payload}");
        assert!(payload.contains(&format!("P:{password};")), "{payload}");
        assert_eq!(payload.contains("H:true"), hidden, "{payload}");
    }
}

#[test]
fn open_networks_have_no_type_or_password() {
    for hidden in [false, true] {
        let payload = WifiCredential::new("Cafe Guest", Some("ignored".into()), Security::None)
            .hidden(hidden)
            .payload();
        assert!(!payload.contains("T:"), "{payload}");
        assert!(!payload.contains("P:"), "{payload}");
        assert_eq!(payload.contains("H:true"), hidden, "{payload}");
    }
}

#[test]
fn reference_examples() {
    let home = WifiCredential::new("HomeNet", Some("secret123".into()), Security::Wpa);
    assert_eq!(home.payload(), "WIFI:S:HomeNet;T:WPA;P:secret123;H:false;;");

    let guest = WifiCredential::new("Guest", None, Security::None);
    assert_eq!(guest.payload(), "WIFI:S:Guest;;");
}

#[test]
fn empty_ssid_is_passed_through() {
    let payload = WifiCredential::new("", None, Security::None).payload();
    assert_eq!(payload, "WIFI:S:;;");
}
