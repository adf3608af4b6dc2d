use image::GenericImageView;
use wifi_qr_generator::qr::{self, QrStyle};
use wifi_qr_generator::{Security, WifiCredential};

fn home() -> WifiCredential {
    WifiCredential::new("HomeNet", Some("secret123".into()), Security::Wpa)
}

#[test]
fn reference_credential_renders_square_png_at_scale() {
    let style = QrStyle::default();
    let code = qr::build_code(&home().payload()).expect("build code");
    let modules = code.width() as u32 + 2 * style.border();

    let rendered = qr::encode(&home(), 5, &style).expect("encode");
    assert_eq!(rendered.modules, modules);

    let decoded = image::load_from_memory(&rendered.png).expect("decode png");
    assert_eq!(decoded.dimensions(), (modules * 5, modules * 5));
}

#[test]
fn open_network_renders_valid_png() {
    let guest = WifiCredential::new("Guest", None, Security::None);
    let rendered = qr::encode(&guest, 5, &QrStyle::default()).expect("encode");
    assert!(rendered.png.starts_with(b"\x89PNG\r\n\x1a\n"));
    let decoded = image::load_from_memory(&rendered.png).expect("decode png");
    assert_eq!(decoded.width(), decoded.height());
}

#[test]
fn identical_inputs_give_identical_bytes() {
    let style = QrStyle::default();
    let first = qr::encode(&home(), 7, &style).expect("encode");
    let second = qr::encode(&home(), 7, &style).expect("encode");
    assert_eq!(first.png, second.png);
}

#[test]
fn dimensions_grow_proportionally_with_scale() {
    let style = QrStyle::default();
    let base = qr::encode(&home(), 1, &style).expect("encode");
    let base_side = image::load_from_memory(&base.png).expect("decode").width();
    let mut previous = base_side;
    for scale in [2, 3, 5, 10] {
        let rendered = qr::encode(&home(), scale, &style).expect("encode");
        let decoded = image::load_from_memory(&rendered.png).expect("decode");
        assert_eq!(decoded.width(), base_side * scale);
        assert_eq!(decoded.height(), base_side * scale);
        assert!(decoded.width() > previous);
        previous = decoded.width();
    }
}

#[test]
fn background_is_transparent() {
    let rendered = qr::encode(&home(), 2, &QrStyle::default()).expect("encode");
    let decoded = image::load_from_memory(&rendered.png).expect("decode").to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
}
